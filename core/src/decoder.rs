#![deny(missing_docs)]

//! # Format Decoder
//!
//! Turns a request body and its declared content type into a [`Record`].
//!
//! JSON bodies are parsed directly. XML bodies are first checked against the
//! resource's XML Schema, then folded into a record and typed per the resource's
//! field table. Any other content type is refused before the body is looked at.

use serde_json::Value;

use crate::error::DecodeError;
use crate::negotiation::ContentFormat;
use crate::record::Record;
use crate::resources::ResourceSpec;
use crate::xml::parse_document;
use crate::xsd::XmlSchemaValidator;

/// Decodes `body` declared as `content_type` for `resource`.
pub fn decode(
    body: &[u8],
    content_type: Option<&str>,
    resource: &ResourceSpec,
    xsd: &dyn XmlSchemaValidator,
) -> Result<Record, DecodeError> {
    match ContentFormat::from_content_type(content_type)? {
        ContentFormat::Json => decode_json(body),
        ContentFormat::Xml => decode_xml(body, resource, xsd),
    }
}

/// Parses a JSON object body.
pub fn decode_json(body: &[u8]) -> Result<Record, DecodeError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err(DecodeError::Malformed(
            "JSON payload must be an object".into(),
        )),
        Err(e) => Err(DecodeError::Malformed(e.to_string())),
    }
}

/// Validates an XML body against the resource's schema, then parses it.
pub fn decode_xml(
    body: &[u8],
    resource: &ResourceSpec,
    xsd: &dyn XmlSchemaValidator,
) -> Result<Record, DecodeError> {
    let text = std::str::from_utf8(body)
        .map_err(|e| DecodeError::Malformed(format!("XML payload is not UTF-8: {e}")))?;

    xsd.validate(text, resource.xsd).map_err(|message| {
        tracing::debug!(resource = resource.tag, %message, "XML schema rejected payload");
        DecodeError::SchemaInvalid(message)
    })?;

    let root = parse_document(text).map_err(DecodeError::Malformed)?;
    Ok(resource.coerce(root.children_to_record()))
}
