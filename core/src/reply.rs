#![deny(missing_docs)]

//! # Replies
//!
//! A handler outcome before rendering: status, payload and resource tag.
//! `From<AppError>` is the one mapping from error kind to what the client sees.

use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult, DecodeError, INVALID_CONTENT_TYPE};
use crate::formatter::{format, Rendered};
use crate::record::{Payload, Record};
use crate::validator::FieldError;

/// Body of `404` replies.
pub const NOT_FOUND: &str = "item not found";
/// Body of uniqueness-conflict replies.
pub const ALREADY_EXISTS: &str = "item already exists.";
/// Body of foreign-key violation replies.
pub const INVALID_REFERENCE: &str = "referenced item does not exist";
/// Body of replies for failures the client cannot act on.
pub const INTERNAL_ERROR: &str = "internal server error";

/// Tag used for decode, validation and request errors.
pub const ERROR_TAG: &str = "error";
/// Tag used for plain status messages.
pub const MESSAGE_TAG: &str = "message";

/// What a handler wants to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Body content.
    pub payload: Payload,
    /// Resource tag for XML wrapping.
    pub tag: &'static str,
}

impl Reply {
    /// A reply with an explicit status.
    pub fn new(status: u16, payload: impl Into<Payload>, tag: &'static str) -> Self {
        Self {
            status,
            payload: payload.into(),
            tag,
        }
    }

    /// `200 OK`.
    pub fn ok(payload: impl Into<Payload>, tag: &'static str) -> Self {
        Self::new(200, payload, tag)
    }

    /// `201 Created`.
    pub fn created(payload: impl Into<Payload>, tag: &'static str) -> Self {
        Self::new(201, payload, tag)
    }

    /// Serializes a persisted row or list of rows into a reply.
    pub fn serialize<T: Serialize + ?Sized>(
        status: u16,
        value: &T,
        tag: &'static str,
    ) -> AppResult<Self> {
        Ok(Self::new(status, Payload::from_serialize(value)?, tag))
    }

    /// Renders through the response formatter.
    pub fn render(self, accept: Option<&str>) -> Rendered {
        format(self.status, self.payload, self.tag, accept)
    }
}

fn field_error_record(error: FieldError) -> Record {
    let mut record = Record::new();
    record.insert("fieldPath".into(), Value::String(error.field_path));
    record.insert("constraint".into(), Value::String(error.constraint));
    record.insert("message".into(), Value::String(error.message));
    record
}

impl From<AppError> for Reply {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Decode(DecodeError::UnsupportedContentType) => {
                tracing::warn!("rejected request with unsupported content type");
                Reply::new(400, Payload::Fault(INVALID_CONTENT_TYPE.into()), ERROR_TAG)
            }
            AppError::Decode(DecodeError::Malformed(message))
            | AppError::Decode(DecodeError::SchemaInvalid(message)) => {
                tracing::warn!(%message, "rejected undecodable payload");
                Reply::new(400, message, ERROR_TAG)
            }
            AppError::Validation(errors) => {
                tracing::warn!(violations = errors.len(), "rejected invalid payload");
                let records = errors.into_iter().map(field_error_record).collect::<Vec<_>>();
                Reply::new(400, records, ERROR_TAG)
            }
            AppError::NotFound => Reply::new(404, NOT_FOUND, MESSAGE_TAG),
            AppError::Conflict(detail) => {
                tracing::warn!(%detail, "uniqueness conflict");
                Reply::new(400, ALREADY_EXISTS, MESSAGE_TAG)
            }
            AppError::InvalidReference(detail) => {
                tracing::warn!(%detail, "foreign key violation");
                Reply::new(400, INVALID_REFERENCE, ERROR_TAG)
            }
            AppError::BadRequest(message) => Reply::new(400, message, ERROR_TAG),
            other @ (AppError::Io(_) | AppError::Database(_) | AppError::General(_)) => {
                tracing::error!(error = %other, "request failed");
                Reply::new(400, INTERNAL_ERROR, MESSAGE_TAG)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unsupported_content_type_is_a_json_fault() {
        let reply = Reply::from(AppError::Decode(DecodeError::UnsupportedContentType));
        let out = reply.render(Some("application/xml"));
        assert_eq!(out.status, 400);
        assert_eq!(
            out.body_text(),
            r#"{"error":"Invalid content type. Expected application/json or application/xml"}"#
        );
    }

    #[test]
    fn test_decode_messages_are_verbatim() {
        let reply = Reply::from(AppError::Decode(DecodeError::SchemaInvalid(
            "Element 'x': This element is not expected.".into(),
        )));
        assert_eq!(
            reply,
            Reply::new(400, "Element 'x': This element is not expected.", ERROR_TAG)
        );
    }

    #[test]
    fn test_validation_list_keeps_order() {
        let errors = vec![
            FieldError {
                field_path: "/name".into(),
                constraint: "required".into(),
                message: "\"name\" is a required property".into(),
            },
            FieldError {
                field_path: "/floor".into(),
                constraint: "type".into(),
                message: "\"x\" is not of type \"integer\"".into(),
            },
        ];
        let out = Reply::from(AppError::Validation(errors)).render(None);
        assert_eq!(out.status, 400);
        let body: Value = serde_json::from_slice(&out.body).unwrap();
        assert_eq!(body[0]["fieldPath"], "/name");
        assert_eq!(body[1]["fieldPath"], "/floor");
        assert_eq!(body[1]["constraint"], "type");
    }

    #[test]
    fn test_status_table() {
        let cases = [
            (AppError::NotFound, 404, NOT_FOUND, MESSAGE_TAG),
            (AppError::Conflict("key (name)".into()), 400, ALREADY_EXISTS, MESSAGE_TAG),
            (AppError::InvalidReference("fk".into()), 400, INVALID_REFERENCE, ERROR_TAG),
            (AppError::BadRequest("Invalid request".into()), 400, "Invalid request", ERROR_TAG),
            (AppError::Database("pool timed out".into()), 400, INTERNAL_ERROR, MESSAGE_TAG),
            (AppError::General("boom".into()), 400, INTERNAL_ERROR, MESSAGE_TAG),
        ];
        for (error, status, message, tag) in cases {
            assert_eq!(Reply::from(error), Reply::new(status, message, tag));
        }
    }

    #[test]
    fn test_internal_detail_is_not_leaked() {
        let out = Reply::from(AppError::Database("relation \"users\" does not exist".into()))
            .render(Some("application/xml"));
        assert_eq!(out.body_text(), "<message>internal server error</message>");
    }

    #[test]
    fn test_serialize_rows() {
        #[derive(Serialize)]
        struct Row {
            room_id: i32,
        }
        let reply = Reply::serialize(200, &[Row { room_id: 1 }], "room").unwrap();
        let out = reply.render(None);
        assert_eq!(out.body_text(), r#"[{"roomId":1}]"#);
    }
}
