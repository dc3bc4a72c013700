#![deny(missing_docs)]

//! # XML Documents
//!
//! A small element tree read with `quick-xml`, shared by the XML-Schema checker
//! and the XML decoder.
//!
//! Attributes are kept on the node (the schema compiler reads them) but never
//! reach a decoded record. Comments, processing instructions, the prologue and
//! any doctype are skipped. Entity and character references are resolved.

use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;

use crate::record::Record;

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    /// Element name as written (prefix included).
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<XmlNode>,
    /// Concatenated character data directly inside this element.
    pub text: String,
}

impl XmlNode {
    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Value of the attribute called `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the element carries non-whitespace character data.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Converts this element's content into a record value.
    ///
    /// Elements with children become records, repeated sibling names become
    /// arrays, and leaf elements become strings. Whitespace-only leaf text is
    /// the empty string.
    pub fn to_value(&self) -> Value {
        if self.children.is_empty() {
            if self.has_text() {
                Value::String(self.text.clone())
            } else {
                Value::String(String::new())
            }
        } else {
            Value::Object(self.children_to_record())
        }
    }

    /// Folds the children of this element into a record.
    pub fn children_to_record(&self) -> Record {
        let mut record = Record::new();
        for child in &self.children {
            let value = child.to_value();
            match record.get_mut(&child.name) {
                None => {
                    record.insert(child.name.clone(), value);
                }
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            }
        }
        record
    }
}

/// Parses a complete document and returns its root element.
///
/// Errors are returned as the parser's message, ready to surface to a client.
pub fn parse_document(text: &str) -> Result<XmlNode, String> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("XML parse error at position {}: {e}", reader.error_position()))?;

        match event {
            Event::Start(start) => {
                ensure_single_root(&root)?;
                stack.push(open(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root)?;
                let node = open(&start)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| "XML parse error: unexpected closing tag".to_string())?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(content) => {
                let content = utf8(&content)?;
                push_text(&mut stack, content)?;
            }
            Event::CData(content) => {
                let content = utf8(&content)?;
                push_text(&mut stack, content)?;
            }
            Event::GeneralRef(reference) => {
                let resolved = resolve_reference(&reference)?;
                push_text(&mut stack, &resolved.to_string())?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("XML parse error: unexpected end of document".into());
    }
    root.ok_or_else(|| "XML parse error: document has no root element".into())
}

/// Strips a `prefix:` from a qualified name.
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn open(start: &BytesStart<'_>) -> Result<XmlNode, String> {
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| format!("XML parse error: {e}"))?;
        let key = utf8(attribute.key.as_ref())?.to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| format!("XML parse error: {e}"))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlNode {
        name: utf8(start.name().as_ref())?.to_string(),
        attributes,
        ..XmlNode::default()
    })
}

fn utf8(bytes: &[u8]) -> Result<&str, String> {
    std::str::from_utf8(bytes).map_err(|e| format!("XML parse error: invalid UTF-8: {e}"))
}

fn ensure_single_root(root: &Option<XmlNode>) -> Result<(), String> {
    match root {
        Some(_) => Err("XML parse error: junk after document element".into()),
        None => Ok(()),
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}

fn push_text(stack: &mut [XmlNode], content: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(node) => {
            node.text.push_str(content);
            Ok(())
        }
        None if content.trim().is_empty() => Ok(()),
        None => Err("XML parse error: text outside of the root element".into()),
    }
}

fn resolve_reference(reference: &BytesRef<'_>) -> Result<char, String> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| format!("XML parse error: {e}"))?
    {
        return Ok(ch);
    }

    match utf8(reference)? {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "quot" => Ok('"'),
        "apos" => Ok('\''),
        other => Err(format!("XML parse error: unknown entity '&{other};'")),
    }
}
