#![deny(missing_docs)]

//! # Generic Records
//!
//! The canonical in-memory shape produced by decoding and consumed by
//! formatting. A [`Record`] is an insertion-ordered string-keyed map; the
//! `preserve_order` feature of `serde_json` keeps field order stable from the
//! wire to the rendered XML.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// Ordered mapping from field name to value. Keys are unique by construction.
pub type Record = Map<String, Value>;

/// Everything the response formatter knows how to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A bare message, rendered as `{"message": ..}` or `<tag>..</tag>`.
    Message(String),
    /// A single record.
    Record(Record),
    /// An ordered collection of records (possibly empty).
    Records(Vec<Record>),
    /// A transport-level rejection, always rendered as JSON `{"error": ..}`.
    Fault(String),
}

impl Payload {
    /// Serializes a value and classifies it as a message, record or collection.
    ///
    /// Collections must contain only objects; anything else is an internal error
    /// since every persisted row serializes to an object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> AppResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| AppError::General(format!("failed to serialize payload: {e}")))?;

        match value {
            Value::String(text) => Ok(Payload::Message(text)),
            Value::Object(record) => Ok(Payload::Record(record)),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(AppError::General(format!(
                        "collection item is not an object: {other}"
                    ))),
                })
                .collect::<AppResult<Vec<_>>>()
                .map(Payload::Records),
            other => Err(AppError::General(format!(
                "payload must be a string, object or array, got {other}"
            ))),
        }
    }
}

impl From<&str> for Payload {
    fn from(message: &str) -> Self {
        Payload::Message(message.to_string())
    }
}

impl From<String> for Payload {
    fn from(message: String) -> Self {
        Payload::Message(message)
    }
}

impl From<Record> for Payload {
    fn from(record: Record) -> Self {
        Payload::Record(record)
    }
}

impl From<Vec<Record>> for Payload {
    fn from(records: Vec<Record>) -> Self {
        Payload::Records(records)
    }
}
