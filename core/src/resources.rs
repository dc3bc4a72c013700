#![deny(missing_docs)]

//! # Resource Definitions
//!
//! Declarative per-resource configuration: the tag used for XML wrapping, the
//! names of the JSON Schema and XML Schema documents, and the table mapping
//! wire fields to storage columns.
//!
//! The schema documents themselves are embedded from `core/schemas/`.

use serde_json::Value;

use crate::case::storage_key;
use crate::error::AppResult;
use crate::record::Record;
use crate::validator::SchemaRegistry;
use FieldKind::{Integer, Number, Text};

/// Scalar kind of a field, used to type the text values of XML payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept as a string.
    Text,
    /// Parsed as a signed integer.
    Integer,
    /// Parsed as a floating point number.
    Number,
    /// `true`/`false`/`1`/`0`.
    Boolean,
}

/// Maps one wire field to its storage column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Name in request payloads.
    pub wire: &'static str,
    /// Storage column name.
    pub column: &'static str,
    /// Scalar kind of the value.
    pub kind: FieldKind,
}

const fn field(wire: &'static str, column: &'static str, kind: FieldKind) -> FieldMapping {
    FieldMapping { wire, column, kind }
}

/// Everything the pipeline needs to know about one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Logical tag, also the XML root element name.
    pub tag: &'static str,
    /// Name of the JSON Schema in the [`SchemaRegistry`].
    pub schema: &'static str,
    /// Name of the XML Schema document.
    pub xsd: &'static str,
    /// Wire field table.
    pub fields: &'static [FieldMapping],
}

impl ResourceSpec {
    /// Looks up the mapping for a wire field name.
    pub fn field(&self, wire: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|f| f.wire == wire)
    }

    /// Renames wire keys to storage columns.
    ///
    /// Keys missing from the table fall back to snake_case.
    pub fn to_storage(&self, record: Record) -> Record {
        record
            .into_iter()
            .map(|(key, value)| {
                let column = match self.field(&key) {
                    Some(mapping) => mapping.column.to_string(),
                    None => storage_key(&key),
                };
                (column, value)
            })
            .collect()
    }

    /// Rewrites integral floats such as `3.0` in integer fields as integers.
    pub fn integral(&self, record: Record) -> Record {
        record
            .into_iter()
            .map(|(key, value)| {
                let value = match (self.field(&key).map(|f| f.kind), value) {
                    (Some(Integer), Value::Number(n)) if n.is_f64() => n
                        .as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= MAX_EXACT_FLOAT)
                        .map_or(Value::Number(n), |f| Value::from(f as i64)),
                    (_, value) => value,
                };
                (key, value)
            })
            .collect()
    }

    /// Types the string values of an XML-decoded record per the field table.
    ///
    /// Text that does not parse as the declared kind is left as is, so the
    /// schema validator reports it as a type violation.
    pub fn coerce(&self, record: Record) -> Record {
        record
            .into_iter()
            .map(|(key, value)| {
                let value = match (self.field(&key).map(|f| f.kind), value) {
                    (Some(kind), Value::String(text)) => coerce_text(kind, text),
                    (_, value) => value,
                };
                (key, value)
            })
            .collect()
    }
}

/// 2^53; integers up to this magnitude are exact in an `f64`.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

fn coerce_text(kind: FieldKind, text: String) -> Value {
    let trimmed = text.trim();
    let coerced = match kind {
        FieldKind::Text => None,
        FieldKind::Integer => trimmed.parse::<i64>().ok().map(Value::from),
        FieldKind::Number => trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::from),
        FieldKind::Boolean => match trimmed {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
    };
    coerced.unwrap_or(Value::String(text))
}

/// `/company`
pub const COMPANY: ResourceSpec = ResourceSpec {
    tag: "company",
    schema: "company",
    xsd: "company",
    fields: &[
        field("name", "name", Text),
        field("representativeName", "representative_name", Text),
        field("representativeEmail", "representative_email", Text),
    ],
};

/// `/location`
pub const LOCATION: ResourceSpec = ResourceSpec {
    tag: "location",
    schema: "location",
    xsd: "location",
    fields: &[
        field("name", "name", Text),
        field("type", "type", Text),
        field("street", "street", Text),
        field("number", "number", Text),
        field("city", "city", Text),
        field("company", "company", Text),
    ],
};

/// `/room`
pub const ROOM: ResourceSpec = ResourceSpec {
    tag: "room",
    schema: "room",
    xsd: "room",
    fields: &[
        field("locationId", "location_id", Integer),
        field("name", "name", Text),
        field("floor", "floor", Integer),
    ],
};

/// `/sensor`
pub const SENSOR: ResourceSpec = ResourceSpec {
    tag: "sensor",
    schema: "sensor",
    xsd: "sensor",
    fields: &[
        field("deviceUuid", "device_uuid", Text),
        field("name", "name", Text),
        field("battery", "battery", Integer),
        field("roomId", "room_id", Integer),
        field("description", "description", Text),
    ],
};

/// `/type`, a measurement type such as temperature or CO2.
pub const MEASUREMENT_TYPE: ResourceSpec = ResourceSpec {
    tag: "type",
    schema: "type",
    xsd: "type",
    fields: &[
        field("name", "name", Text),
        field("description", "description", Text),
        field("measurementUnit", "measurement_unit", Text),
    ],
};

/// `/sensorTypeThreshold`
pub const SENSOR_TYPE_THRESHOLD: ResourceSpec = ResourceSpec {
    tag: "sensorTypeThreshold",
    schema: "sensorTypeThreshold",
    xsd: "sensorTypeThreshold",
    fields: &[
        field("deviceUuid", "sensor_device_uuid", Text),
        field("typeName", "type_name", Text),
        field("minValue", "min_value", Number),
        field("maxValue", "max_value", Number),
        field("duration", "duration", Integer),
    ],
};

/// `/malfunctionContact`
pub const MALFUNCTION_CONTACT: ResourceSpec = ResourceSpec {
    tag: "malfunctionContact",
    schema: "malfunctionContact",
    xsd: "malfunctionContact",
    fields: &[
        field("incidentId", "incident_id", Integer),
        field("deviceUuid", "sensor_device_uuid", Text),
        field("typeName", "type_name", Text),
    ],
};

/// `/measurement`
pub const MEASUREMENT: ResourceSpec = ResourceSpec {
    tag: "measurement",
    schema: "measurement",
    xsd: "measurement",
    fields: &[
        field("value", "value", Number),
        field("timestamp", "timestamp", Integer),
        field("deviceUuid", "sensor_device_uuid", Text),
        field("typeName", "type_name", Text),
    ],
};

/// `/role`
pub const ROLE: ResourceSpec = ResourceSpec {
    tag: "role",
    schema: "role",
    xsd: "role",
    fields: &[field("name", "name", Text)],
};

/// `/user`
pub const USER: ResourceSpec = ResourceSpec {
    tag: "user",
    schema: "user",
    xsd: "user",
    fields: &[
        field("name", "name", Text),
        field("email", "email", Text),
        field("phoneNumber", "phone_number", Text),
        field("password", "password", Text),
    ],
};

/// `/userRole` carries no body; the tag is only used for rendering.
pub const USER_ROLE_TAG: &str = "userRole";

/// Every resource with a request body, in route registration order.
pub static ALL: [ResourceSpec; 10] = [
    COMPANY,
    LOCATION,
    ROOM,
    SENSOR,
    MEASUREMENT_TYPE,
    SENSOR_TYPE_THRESHOLD,
    MALFUNCTION_CONTACT,
    MEASUREMENT,
    ROLE,
    USER,
];

/// Looks up a built-in resource by tag.
pub fn by_tag(tag: &str) -> Option<&'static ResourceSpec> {
    ALL.iter().find(|r| r.tag == tag)
}

/// Built-in draft-07 JSON Schemas as `(name, source)` pairs.
pub const JSON_SCHEMAS: [(&str, &str); 10] = [
    ("company", include_str!("../schemas/json/company.json")),
    ("location", include_str!("../schemas/json/location.json")),
    ("room", include_str!("../schemas/json/room.json")),
    ("sensor", include_str!("../schemas/json/sensor.json")),
    ("type", include_str!("../schemas/json/type.json")),
    (
        "sensorTypeThreshold",
        include_str!("../schemas/json/sensorTypeThreshold.json"),
    ),
    (
        "malfunctionContact",
        include_str!("../schemas/json/malfunctionContact.json"),
    ),
    ("measurement", include_str!("../schemas/json/measurement.json")),
    ("role", include_str!("../schemas/json/role.json")),
    ("user", include_str!("../schemas/json/user.json")),
];

/// Built-in XML Schemas as `(name, source)` pairs.
pub const XML_SCHEMAS: [(&str, &str); 10] = [
    ("company", include_str!("../schemas/xsd/company.xsd")),
    ("location", include_str!("../schemas/xsd/location.xsd")),
    ("room", include_str!("../schemas/xsd/room.xsd")),
    ("sensor", include_str!("../schemas/xsd/sensor.xsd")),
    ("type", include_str!("../schemas/xsd/type.xsd")),
    (
        "sensorTypeThreshold",
        include_str!("../schemas/xsd/sensorTypeThreshold.xsd"),
    ),
    (
        "malfunctionContact",
        include_str!("../schemas/xsd/malfunctionContact.xsd"),
    ),
    ("measurement", include_str!("../schemas/xsd/measurement.xsd")),
    ("role", include_str!("../schemas/xsd/role.xsd")),
    ("user", include_str!("../schemas/xsd/user.xsd")),
];

/// Compiles every built-in JSON Schema into a fresh registry.
pub fn builtin_registry() -> AppResult<SchemaRegistry> {
    let mut registry = SchemaRegistry::new();
    for (name, source) in JSON_SCHEMAS {
        registry.register_str(name, source)?;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_integral_floats_become_integers() {
        let input = record(json!({"locationId": 3.0, "floor": -2.0, "name": 4.0}));
        let output = ROOM.integral(input);
        assert_eq!(
            Value::Object(output),
            json!({"locationId": 3, "floor": -2, "name": 4.0})
        );

        let input = record(json!({"locationId": 3.5, "floor": 1e300}));
        let output = ROOM.integral(input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn test_builtin_schemas_compile() {
        let registry = builtin_registry().unwrap();
        for resource in ALL {
            assert!(registry.contains(resource.schema), "{}", resource.schema);
        }
    }

    #[test]
    fn test_every_resource_has_an_xsd() {
        for resource in ALL {
            assert!(
                XML_SCHEMAS.iter().any(|(name, _)| *name == resource.xsd),
                "{}",
                resource.xsd
            );
        }
    }

    #[test]
    fn test_to_storage_uses_table_then_snake_case() {
        let input = record(json!({"deviceUuid": "abc", "minValue": 1.0, "extraField": 1}));
        let output = SENSOR_TYPE_THRESHOLD.to_storage(input);
        assert_eq!(
            Value::Object(output),
            json!({"sensor_device_uuid": "abc", "min_value": 1.0, "extra_field": 1})
        );
    }

    #[test]
    fn test_coerce_types_xml_text() {
        let input = record(json!({
            "deviceUuid": "a1",
            "minValue": "1.5",
            "maxValue": " 30 ",
            "duration": "60",
            "typeName": "42"
        }));
        let output = SENSOR_TYPE_THRESHOLD.coerce(input);
        assert_eq!(
            Value::Object(output),
            json!({
                "deviceUuid": "a1",
                "minValue": 1.5,
                "maxValue": 30.0,
                "duration": 60,
                "typeName": "42"
            })
        );
    }

    #[test]
    fn test_coerce_leaves_garbage_for_the_validator() {
        let output = ROOM.coerce(record(json!({"floor": "third", "locationId": ""})));
        assert_eq!(
            Value::Object(output),
            json!({"floor": "third", "locationId": ""})
        );
    }

    #[test]
    fn test_by_tag() {
        assert_eq!(by_tag("sensorTypeThreshold"), Some(&SENSOR_TYPE_THRESHOLD));
        assert_eq!(by_tag("userRole"), None);
    }
}
