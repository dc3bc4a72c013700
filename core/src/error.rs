//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace, and the
//! narrower `DecodeError` produced while turning a request body into a record.

use derive_more::{Display, From};

use crate::validator::FieldError;

/// Fixed message returned when a request declares an unsupported `Content-Type`.
pub const INVALID_CONTENT_TYPE: &str =
    "Invalid content type. Expected application/json or application/xml";

/// Failure to turn a raw request body into a [`Record`](crate::record::Record).
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The declared content type is neither JSON nor XML. Decoding is never attempted.
    #[display("Invalid content type. Expected application/json or application/xml")]
    UnsupportedContentType,

    /// The body could not be parsed (bad JSON, bad XML, or not an object).
    #[display("{_0}")]
    Malformed(String),

    /// The XML body failed XML-Schema validation, or the validator itself failed.
    #[display("{_0}")]
    SchemaInvalid(String),
}

impl std::error::Error for DecodeError {}

/// The Global Error Enum.
///
/// `String` errors default to `General`; every other string-carrying variant
/// must be constructed explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The request body could not be decoded.
    #[display("Decode Error: {_0}")]
    Decode(DecodeError),

    /// The decoded record violates its resource schema.
    #[from(ignore)]
    #[display("Validation Error: {} violation(s)", _0.len())]
    Validation(Vec<FieldError>),

    /// The addressed item does not exist.
    #[from(ignore)]
    #[display("Not Found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[from(ignore)]
    #[display("Conflict: {_0}")]
    Conflict(String),

    /// A referenced row (foreign key) does not exist.
    #[from(ignore)]
    #[display("Invalid Reference: {_0}")]
    InvalidReference(String),

    /// The request itself is unusable (e.g. malformed path parameters).
    #[from(ignore)]
    #[display("Bad Request: {_0}")]
    BadRequest(String),

    /// Wrapper for Database string errors.
    #[from(ignore)]
    #[display("Database Error: {_0}")]
    Database(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_decode_conversion_keeps_message() {
        let app_err: AppError = DecodeError::Malformed("EOF while parsing".into()).into();
        assert_eq!(app_err.to_string(), "Decode Error: EOF while parsing");
    }

    #[test]
    fn test_unsupported_content_type_message() {
        assert_eq!(
            DecodeError::UnsupportedContentType.to_string(),
            "Invalid content type. Expected application/json or application/xml"
        );
    }

    #[test]
    fn test_database_manual_creation() {
        let app_err = AppError::Database("db fail".into());
        assert_eq!(format!("{}", app_err), "Database Error: db fail");
    }
}
