#![deny(missing_docs)]

//! # Sensorhub Core
//!
//! Framework-agnostic request pipeline for the sensorhub API: content
//! negotiation, JSON/XML decoding, schema validation, case normalization and
//! response rendering.

/// Shared error types.
pub mod error;

/// The generic record and payload shapes.
pub mod record;

/// Wire/storage key case conversion.
pub mod case;

/// `Content-Type` and `Accept` handling.
pub mod negotiation;

/// XML element trees.
pub mod xml;

/// XML Schema validation.
pub mod xsd;

/// JSON Schema validation.
pub mod validator;

/// Request body decoding.
pub mod decoder;

/// Response rendering.
pub mod formatter;

/// Handler outcomes and error mapping.
pub mod reply;

/// Per-resource configuration.
pub mod resources;

/// Decoder and validator, wired together.
pub mod pipeline;

pub use error::{AppError, AppResult, DecodeError};
pub use formatter::{format, Rendered};
pub use negotiation::{ContentFormat, NegotiationContext};
pub use pipeline::Pipeline;
pub use record::{Payload, Record};
pub use reply::Reply;
pub use resources::ResourceSpec;
pub use validator::{FieldError, SchemaRegistry, ValidationOutcome};
pub use xsd::{LocalXsdValidator, XmlSchemaValidator};
