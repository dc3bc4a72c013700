#![deny(missing_docs)]

//! # Schema Validation
//!
//! A registry of compiled draft-07 JSON Schemas, one per resource.
//!
//! The registry is filled once at startup and only read afterwards, so it can be
//! shared between request workers behind an `Arc` without locking. Format
//! keywords (`email`, `date-time`, ...) are enforced.

use indexmap::IndexMap;
use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, Validator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::record::Record;

/// One constraint violation, in the order the schema engine reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// JSON pointer to the offending field, e.g. `/representativeEmail`.
    pub field_path: String,
    /// The schema keyword that failed (`required`, `type`, `format`, ...).
    pub constraint: String,
    /// Human readable description from the schema engine.
    pub message: String,
}

/// Result of validating a record.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The record satisfies its schema.
    Valid(Record),
    /// The ordered list of violations. Never empty.
    Invalid(Vec<FieldError>),
}

impl ValidationOutcome {
    /// Converts the outcome into a `Result`, turning violations into
    /// [`AppError::Validation`].
    pub fn into_result(self) -> AppResult<Record> {
        match self {
            ValidationOutcome::Valid(record) => Ok(record),
            ValidationOutcome::Invalid(errors) => Err(AppError::Validation(errors)),
        }
    }
}

/// Compiled schemas keyed by name, in registration order.
#[derive(Default)]
pub struct SchemaRegistry {
    validators: IndexMap<String, Validator>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.validators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `schema` and stores it under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::General`] if the document is not a valid schema or the
    /// name is already taken.
    pub fn register(&mut self, name: &str, schema: &Value) -> AppResult<()> {
        if self.validators.contains_key(name) {
            return Err(AppError::General(format!(
                "schema '{name}' is registered twice"
            )));
        }

        let validator = jsonschema::options()
            .with_draft(Draft::Draft7)
            .should_validate_formats(true)
            .build(schema)
            .map_err(|e| AppError::General(format!("schema '{name}' failed to compile: {e}")))?;

        self.validators.insert(name.to_string(), validator);
        Ok(())
    }

    /// Parses `source` as JSON and registers it under `name`.
    pub fn register_str(&mut self, name: &str, source: &str) -> AppResult<()> {
        let schema: Value = serde_json::from_str(source)
            .map_err(|e| AppError::General(format!("schema '{name}' is not valid JSON: {e}")))?;
        self.register(name, &schema)
    }

    /// Names of all registered schemas, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    /// Whether a schema with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Validates `record` against the schema called `schema_name`.
    ///
    /// An unknown schema name is a programming error and fails closed: the
    /// record is reported invalid rather than silently accepted.
    pub fn validate(&self, record: Record, schema_name: &str) -> ValidationOutcome {
        let Some(validator) = self.validators.get(schema_name) else {
            tracing::error!(schema = schema_name, "validation requested for unknown schema");
            return ValidationOutcome::Invalid(vec![FieldError {
                field_path: String::new(),
                constraint: "schema".into(),
                message: format!("no schema registered under '{schema_name}'"),
            }]);
        };

        let instance = Value::Object(record);
        let errors: Vec<FieldError> = validator
            .iter_errors(&instance)
            .map(|error| {
                let schema_path = error.schema_path().to_string();
                let constraint = schema_path
                    .rsplit('/')
                    .next()
                    .unwrap_or_default()
                    .to_string();

                let mut field_path = error.instance_path().to_string();
                if let ValidationErrorKind::Required { property } = error.kind() {
                    if let Some(property) = property.as_str() {
                        field_path = format!("{field_path}/{property}");
                    }
                }

                FieldError {
                    field_path,
                    constraint,
                    message: error.to_string(),
                }
            })
            .collect();

        match instance {
            Value::Object(record) if errors.is_empty() => ValidationOutcome::Valid(record),
            _ => {
                tracing::debug!(schema = schema_name, violations = errors.len(), "record rejected");
                ValidationOutcome::Invalid(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                "company",
                &json!({
                    "$schema": "http://json-schema.org/draft-07/schema#",
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "minLength": 1 },
                        "representativeEmail": { "type": "string", "format": "email" }
                    },
                    "required": ["name", "representativeEmail"]
                }),
            )
            .unwrap();
        registry
    }

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_valid_record_is_returned_unchanged() {
        let input = record(json!({"name": "Acme", "representativeEmail": "a@acme.io"}));
        assert_eq!(
            registry().validate(input.clone(), "company"),
            ValidationOutcome::Valid(input)
        );
    }

    #[test]
    fn test_missing_field_names_the_path() {
        let outcome = registry().validate(record(json!({"name": "Acme"})), "company");
        let ValidationOutcome::Invalid(errors) = outcome else {
            panic!("expected violations");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, "/representativeEmail");
        assert_eq!(errors[0].constraint, "required");
    }

    #[test]
    fn test_format_is_enforced() {
        let outcome = registry().validate(
            record(json!({"name": "Acme", "representativeEmail": "not-an-email"})),
            "company",
        );
        let ValidationOutcome::Invalid(errors) = outcome else {
            panic!("format violations must not pass");
        };
        assert_eq!(errors[0].field_path, "/representativeEmail");
        assert_eq!(errors[0].constraint, "format");
    }

    #[test]
    fn test_unknown_schema_fails_closed() {
        let outcome = registry().validate(record(json!({})), "nope");
        assert!(matches!(outcome, ValidationOutcome::Invalid(ref e) if e[0].constraint == "schema"));
    }

    #[test]
    fn test_duplicate_and_broken_schemas_are_rejected() {
        let mut registry = registry();
        assert!(registry.register("company", &json!({})).is_err());
        assert!(registry.register("broken", &json!({"type": 12})).is_err());
        assert!(registry.register_str("text", "{ not json").is_err());
    }

    #[test]
    fn test_field_error_wire_shape() {
        let error = FieldError {
            field_path: "/name".into(),
            constraint: "type".into(),
            message: "12 is not of type \"string\"".into(),
        };
        assert_eq!(
            serde_json::to_value(error).unwrap(),
            json!({
                "fieldPath": "/name",
                "constraint": "type",
                "message": "12 is not of type \"string\""
            })
        );
    }
}
