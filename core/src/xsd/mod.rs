#![deny(missing_docs)]

//! # XML Schema Validation
//!
//! - **compile**: XSD documents to an in-memory model.
//! - **check**: instance validation with libxml2-style messages.
//! - **remote**: delegation to an external validation service.

pub mod check;
pub mod compile;
#[cfg(feature = "remote-xsd")]
pub mod remote;

use indexmap::IndexMap;

use crate::error::{AppError, AppResult};
use crate::resources::XML_SCHEMAS;
use crate::xml::parse_document;

pub use compile::Schema;
#[cfg(feature = "remote-xsd")]
pub use remote::RemoteXsdValidator;

/// Validates raw XML text against a named XML Schema.
///
/// Implementations are shared between request workers and must not hold
/// per-request state. An `Err` carries the message surfaced to the client.
pub trait XmlSchemaValidator: Send + Sync {
    /// Checks `xml` against the schema registered as `schema`.
    fn validate(&self, xml: &str, schema: &str) -> Result<(), String>;
}

/// In-process validator over schemas compiled at startup.
#[derive(Debug, Default, Clone)]
pub struct LocalXsdValidator {
    schemas: IndexMap<String, Schema>,
}

impl LocalXsdValidator {
    /// Creates a validator with no schemas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles every built-in resource schema.
    pub fn builtin() -> AppResult<Self> {
        let mut validator = Self::new();
        for (name, source) in XML_SCHEMAS {
            validator.register(name, source)?;
        }
        Ok(validator)
    }

    /// Compiles `source` and stores it under `name`.
    pub fn register(&mut self, name: &str, source: &str) -> AppResult<()> {
        if self.schemas.contains_key(name) {
            return Err(AppError::General(format!(
                "XML schema '{name}' is registered twice"
            )));
        }
        let schema = compile::compile(source)
            .map_err(|e| AppError::General(format!("XML schema '{name}' failed to compile: {e}")))?;
        self.schemas.insert(name.to_string(), schema);
        Ok(())
    }

    /// Names of the registered schemas, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

impl XmlSchemaValidator for LocalXsdValidator {
    fn validate(&self, xml: &str, schema: &str) -> Result<(), String> {
        let compiled = self
            .schemas
            .get(schema)
            .ok_or_else(|| format!("no XML schema registered under '{schema}'"))?;
        let root = parse_document(xml)?;
        check::validate_document(compiled, &root)
    }
}
