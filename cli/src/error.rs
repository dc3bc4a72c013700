#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use sensorhub_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Pipeline setup failure (e.g. a built-in schema does not compile).
    #[display("{}", _0)]
    App(AppError),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err: CliError = String::from("unknown resource").into();
        assert_eq!(err.to_string(), "Operation failed: unknown resource");

        let err: CliError = AppError::General("schema 'x' is invalid".into()).into();
        assert_eq!(err.to_string(), "General Error: schema 'x' is invalid");
    }
}
