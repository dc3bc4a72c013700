#![deny(missing_docs)]

//! # Request Pipeline
//!
//! Decoder, then schema validation, for one resource. Built once at startup
//! and shared read-only; every call starts from scratch.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::decoder::decode;
use crate::error::{AppError, AppResult};
use crate::record::Record;
use crate::resources::{builtin_registry, ResourceSpec};
use crate::validator::{FieldError, SchemaRegistry};
use crate::xsd::{LocalXsdValidator, XmlSchemaValidator};

/// Shared, read-only request pipeline.
#[derive(Clone)]
pub struct Pipeline {
    schemas: Arc<SchemaRegistry>,
    xsd: Arc<dyn XmlSchemaValidator>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("schemas", &self.schemas)
            .finish_non_exhaustive()
    }
}

impl Pipeline {
    /// Assembles a pipeline from its parts.
    pub fn new(schemas: SchemaRegistry, xsd: Arc<dyn XmlSchemaValidator>) -> Self {
        Self {
            schemas: Arc::new(schemas),
            xsd,
        }
    }

    /// The built-in JSON Schemas with the in-process XSD checker.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self::new(
            builtin_registry()?,
            Arc::new(LocalXsdValidator::builtin()?),
        ))
    }

    /// The JSON Schema registry.
    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    /// Decodes and validates a request body, returning the wire-case record.
    pub fn accept(
        &self,
        resource: &ResourceSpec,
        content_type: Option<&str>,
        body: &[u8],
    ) -> AppResult<Record> {
        let record = decode(body, content_type, resource, self.xsd.as_ref())?;
        tracing::debug!(resource = resource.tag, fields = record.len(), "payload decoded");
        self.schemas.validate(record, resource.schema).into_result()
    }

    /// Like [`Pipeline::accept`], then maps to storage columns and deserializes.
    pub fn accept_as<T: DeserializeOwned>(
        &self,
        resource: &ResourceSpec,
        content_type: Option<&str>,
        body: &[u8],
    ) -> AppResult<T> {
        let record = resource.integral(self.accept(resource, content_type, body)?);
        let storage = Value::Object(resource.to_storage(record));
        serde_json::from_value(storage).map_err(|e| {
            tracing::warn!(resource = resource.tag, error = %e, "payload does not fit its model");
            AppError::Validation(vec![FieldError {
                field_path: String::new(),
                constraint: "type".into(),
                message: e.to_string(),
            }])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::resources::{COMPANY, ROOM, SENSOR_TYPE_THRESHOLD};
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct NewThreshold {
        sensor_device_uuid: String,
        type_name: String,
        min_value: f64,
        max_value: f64,
        duration: i32,
    }

    #[test]
    fn test_json_and_xml_agree() {
        let pipeline = Pipeline::builtin().unwrap();
        let json = pipeline
            .accept_as::<NewThreshold>(
                &SENSOR_TYPE_THRESHOLD,
                Some("application/json"),
                br#"{"deviceUuid":"a1","typeName":"co2","minValue":400,"maxValue":1200.5,"duration":60}"#,
            )
            .unwrap();
        let xml = pipeline
            .accept_as::<NewThreshold>(
                &SENSOR_TYPE_THRESHOLD,
                Some("application/xml"),
                b"<sensorTypeThreshold><deviceUuid>a1</deviceUuid><typeName>co2</typeName>\
                  <minValue>400</minValue><maxValue>1200.5</maxValue><duration>60</duration>\
                  </sensorTypeThreshold>",
            )
            .unwrap();
        assert_eq!(json, xml);
        assert_eq!(json.sensor_device_uuid, "a1");
        assert_eq!(json.min_value, 400.0);
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct NewRoom {
        location_id: i32,
        name: String,
        floor: i32,
    }

    #[test]
    fn test_integer_overflow_is_a_client_error() {
        let pipeline = Pipeline::builtin().unwrap();
        let err = pipeline
            .accept_as::<NewRoom>(
                &ROOM,
                Some("application/json"),
                br#"{"locationId":3000000000,"name":"Lab","floor":1}"#,
            )
            .unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field_path, "/locationId");
        assert_eq!(errors[0].constraint, "maximum");

        let err = pipeline
            .accept_as::<NewRoom>(
                &ROOM,
                Some("application/xml"),
                b"<room><locationId>3000000000</locationId><name>Lab</name><floor>1</floor></room>",
            )
            .unwrap_err();
        let AppError::Decode(DecodeError::SchemaInvalid(message)) = err else {
            panic!("expected an XML schema rejection, got {err:?}");
        };
        assert!(message.contains("locationId"), "{message}");

        let err = pipeline
            .accept_as::<NewRoom>(
                &ROOM,
                Some("application/xml"),
                b"<room><locationId>1</locationId><name>Lab</name><floor>3000000000</floor></room>",
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Decode(DecodeError::SchemaInvalid(_))));
    }

    #[test]
    fn test_integral_float_fits_integer_column() {
        let pipeline = Pipeline::builtin().unwrap();
        let room = pipeline
            .accept_as::<NewRoom>(
                &ROOM,
                Some("application/json"),
                br#"{"locationId":3.0,"name":"Lab","floor":-1.0}"#,
            )
            .unwrap();
        assert_eq!(
            room,
            NewRoom {
                location_id: 3,
                name: "Lab".into(),
                floor: -1,
            }
        );
    }

    #[test]
    fn test_model_mismatch_is_a_client_error() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Narrow {
            location_id: i8,
        }

        let pipeline = Pipeline::builtin().unwrap();
        let err = pipeline
            .accept_as::<Narrow>(
                &ROOM,
                Some("application/json"),
                br#"{"locationId":300,"name":"Lab","floor":1}"#,
            )
            .unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert_eq!(errors[0].constraint, "type");
    }

    #[test]
    fn test_validation_errors_surface() {
        let pipeline = Pipeline::builtin().unwrap();
        let err = pipeline
            .accept(&COMPANY, Some("application/json"), br#"{"name":"Acme"}"#)
            .unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation errors, got {err:?}");
        };
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|e| e.constraint == "required"));
    }

    #[test]
    fn test_content_type_is_checked_first() {
        let pipeline = Pipeline::builtin().unwrap();
        let err = pipeline.accept(&COMPANY, Some("text/plain"), b"").unwrap_err();
        assert!(matches!(
            err,
            AppError::Decode(DecodeError::UnsupportedContentType)
        ));
    }

    #[test]
    fn test_record_is_returned_in_wire_case() {
        let pipeline = Pipeline::builtin().unwrap();
        let record = pipeline
            .accept(
                &COMPANY,
                Some("application/json"),
                br#"{"name":"Acme","representativeName":"Ada","representativeEmail":"ada@acme.io"}"#,
            )
            .unwrap();
        assert_eq!(
            Value::Object(record),
            json!({"name":"Acme","representativeName":"Ada","representativeEmail":"ada@acme.io"})
        );
    }
}
