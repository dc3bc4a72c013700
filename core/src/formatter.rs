#![deny(missing_docs)]

//! # Response Formatter
//!
//! The single place a response body is produced. The `Accept` header picks
//! JSON or XML; anything unacceptable becomes `406 Not Acceptable` whatever
//! status the caller intended.
//!
//! Records are always rewritten to wire case before rendering, in both formats.
//! XML is built with `quick-xml`'s writer, so text content is escaped.

use std::io;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{json, Value};

use crate::case::payload_to_wire_case;
use crate::negotiation::{negotiate, ContentFormat, APPLICATION_JSON, APPLICATION_XML};
use crate::record::{Payload, Record};

/// Content type of the `406` body.
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Body sent with `406`.
pub const NOT_ACCEPTABLE: &str = "Not Acceptable";

/// A fully rendered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// HTTP status code.
    pub status: u16,
    /// Value for the `Content-Type` header.
    pub content_type: &'static str,
    /// Response body.
    pub body: Vec<u8>,
}

impl Rendered {
    /// The body as text, for logging and tests.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn not_acceptable() -> Self {
        Self {
            status: 406,
            content_type: TEXT_PLAIN,
            body: NOT_ACCEPTABLE.as_bytes().to_vec(),
        }
    }
}

/// Name of the element wrapping a collection of `tag` items.
pub fn pluralize(tag: &str) -> String {
    match tag {
        "company" => "companies".to_string(),
        other => format!("{other}s"),
    }
}

/// Renders `payload` for a client that sent `accept`.
///
/// [`Payload::Fault`] skips negotiation and is always JSON `{"error": ..}`.
pub fn format(status: u16, payload: Payload, tag: &str, accept: Option<&str>) -> Rendered {
    if let Payload::Fault(message) = payload {
        return Rendered {
            status,
            content_type: APPLICATION_JSON,
            body: json!({ "error": message }).to_string().into_bytes(),
        };
    }

    let Some(format) = negotiate(accept) else {
        tracing::debug!(?accept, "no acceptable representation");
        return Rendered::not_acceptable();
    };

    let payload = payload_to_wire_case(payload);
    match format {
        ContentFormat::Json => Rendered {
            status,
            content_type: APPLICATION_JSON,
            body: render_json(payload).to_string().into_bytes(),
        },
        ContentFormat::Xml => match render_xml(&payload, tag) {
            Ok(body) => Rendered {
                status,
                content_type: APPLICATION_XML,
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, tag, "failed to write XML response");
                Rendered {
                    status: 500,
                    content_type: TEXT_PLAIN,
                    body: b"Internal Server Error".to_vec(),
                }
            }
        },
    }
}

fn render_json(payload: Payload) -> Value {
    match payload {
        Payload::Message(message) => json!({ "message": message }),
        Payload::Record(record) => Value::Object(record),
        Payload::Records(records) => Value::Array(records.into_iter().map(Value::Object).collect()),
        Payload::Fault(message) => json!({ "error": message }),
    }
}

/// Renders an XML document (or bare element for messages) for `payload`.
pub fn render_xml(payload: &Payload, tag: &str) -> io::Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    match payload {
        Payload::Message(message) | Payload::Fault(message) => {
            write_text_element(&mut writer, tag, message)?;
        }
        Payload::Record(record) => {
            write_prologue(&mut writer)?;
            write_record(&mut writer, tag, record)?;
        }
        Payload::Records(records) => {
            let wrapper = pluralize(tag);
            write_prologue(&mut writer)?;
            writer.write_event(Event::Start(BytesStart::new(wrapper.as_str())))?;
            for record in records {
                write_record(&mut writer, tag, record)?;
            }
            writer.write_event(Event::End(BytesEnd::new(wrapper.as_str())))?;
        }
    }

    Ok(writer.into_inner())
}

fn write_prologue(writer: &mut Writer<Vec<u8>>) -> io::Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
}

fn write_record(writer: &mut Writer<Vec<u8>>, name: &str, record: &Record) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    for (key, value) in record {
        write_value(writer, key, value)?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    if !text.is_empty() {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(name)))
}

/// Arrays repeat the element once per item; objects nest; null is empty.
fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> io::Result<()> {
    match value {
        Value::Null => write_text_element(writer, name, ""),
        Value::String(text) => write_text_element(writer, name, text),
        Value::Bool(b) => write_text_element(writer, name, &b.to_string()),
        Value::Number(n) => write_text_element(writer, name, &n.to_string()),
        Value::Object(record) => write_record(writer, name, record),
        Value::Array(items) => items
            .iter()
            .try_for_each(|item| write_value(writer, name, item)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_CONTENT_TYPE;
    use pretty_assertions::assert_eq;

    const PROLOGUE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("company"), "companies");
        assert_eq!(pluralize("location"), "locations");
        assert_eq!(pluralize("sensorTypeThreshold"), "sensorTypeThresholds");
    }

    #[test]
    fn test_json_message() {
        let out = format(200, "hello".into(), "error", Some("application/json"));
        assert_eq!(out.status, 200);
        assert_eq!(out.content_type, APPLICATION_JSON);
        assert_eq!(out.body_text(), r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_json_records_are_wire_cased() {
        let rows = vec![record(json!({"device_uuid": "a1", "room_id": 2}))];
        let out = format(200, Payload::Records(rows), "sensor", None);
        assert_eq!(out.body_text(), r#"[{"deviceUuid":"a1","roomId":2}]"#);
    }

    #[test]
    fn test_xml_empty_collection() {
        let out = format(400, Payload::Records(vec![]), "location", Some("application/xml"));
        assert_eq!(out.status, 400);
        assert_eq!(out.content_type, APPLICATION_XML);
        let body = out.body_text();
        assert!(body.starts_with(PROLOGUE), "{body}");
        assert!(body.contains("<locations></locations>"), "{body}");
    }

    #[test]
    fn test_xml_collection_items() {
        let rows = vec![
            record(json!({"name": "Acme", "representative_name": "Ada"})),
            record(json!({"name": "Globex", "representative_name": null})),
        ];
        let out = format(200, Payload::Records(rows), "company", Some("application/xml"));
        assert_eq!(
            out.body_text(),
            format!(
                "{PROLOGUE}<companies>\
                 <company><name>Acme</name><representativeName>Ada</representativeName></company>\
                 <company><name>Globex</name><representativeName></representativeName></company>\
                 </companies>"
            )
        );
    }

    #[test]
    fn test_xml_single_record() {
        let row = record(json!({"min_value": 1.5, "active": true}));
        let out = format(201, Payload::Record(row), "sensorTypeThreshold", Some("application/xml"));
        assert_eq!(out.status, 201);
        assert_eq!(
            out.body_text(),
            format!("{PROLOGUE}<sensorTypeThreshold><minValue>1.5</minValue><active>true</active></sensorTypeThreshold>")
        );
    }

    #[test]
    fn test_xml_message_has_no_prologue() {
        let out = format(404, "item not found".into(), "message", Some("application/xml"));
        assert_eq!(out.body_text(), "<message>item not found</message>");
    }

    #[test]
    fn test_xml_text_is_escaped() {
        let row = record(json!({"name": "Fish & <Chips>"}));
        let out = format(200, Payload::Record(row), "type", Some("application/xml"));
        assert!(
            out.body_text().contains("<name>Fish &amp; &lt;Chips&gt;</name>"),
            "{}",
            out.body_text()
        );
    }

    #[test]
    fn test_nested_values() {
        let row = record(json!({"tags": ["a", "b"], "room": {"floor": 2}}));
        let body = render_xml(&Payload::Record(row), "sensor").unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            format!("{PROLOGUE}<sensor><tags>a</tags><tags>b</tags><room><floor>2</floor></room></sensor>")
        );
    }

    #[test]
    fn test_not_acceptable_overrides_status() {
        let out = format(201, Payload::Record(Record::new()), "room", Some("text/plain"));
        assert_eq!(out.status, 406);
        assert_eq!(out.content_type, TEXT_PLAIN);
        assert_eq!(out.body_text(), "Not Acceptable");
    }

    #[test]
    fn test_fault_is_always_json() {
        for accept in [Some("application/xml"), Some("text/plain"), None] {
            let out = format(400, Payload::Fault(INVALID_CONTENT_TYPE.into()), "error", accept);
            assert_eq!(out.status, 400);
            assert_eq!(out.content_type, APPLICATION_JSON);
            assert_eq!(
                out.body_text(),
                r#"{"error":"Invalid content type. Expected application/json or application/xml"}"#
            );
        }
    }
}
