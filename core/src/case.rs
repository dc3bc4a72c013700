#![deny(missing_docs)]

//! # Case Normalization
//!
//! Maps between storage-case keys (`representative_name`) and wire-case keys
//! (`representativeName`). Only the top level of each record is rewritten;
//! nested values are left untouched.

use heck::ToSnakeCase;
use serde_json::Value;

use crate::record::{Payload, Record};

/// Converts one storage-case key to wire case.
///
/// Separators (`_`, `-`, `.`, whitespace) are dropped and the character
/// after an inner separator is uppercased; every other character is kept
/// as is. The output holds no separators, so it maps to itself.
pub fn wire_key(key: &str) -> String {
    let mut wire = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if is_separator(c) {
            upper = !wire.is_empty();
        } else if upper {
            wire.extend(c.to_uppercase());
            upper = false;
        } else {
            wire.push(c);
        }
    }
    wire
}

fn is_separator(c: char) -> bool {
    matches!(c, '_' | '-' | '.') || c.is_whitespace()
}

/// Converts one wire-case key to storage case.
pub fn storage_key(key: &str) -> String {
    key.to_snake_case()
}

/// Rewrites every top-level key of `record` to wire case, preserving order.
///
/// If two storage keys collapse to the same wire key the later one wins
/// and a warning is logged.
pub fn to_wire_case(record: Record) -> Record {
    let mut wire = Record::with_capacity(record.len());
    for (key, value) in record {
        let key = wire_key(&key);
        if wire.insert(key.clone(), value).is_some() {
            tracing::warn!(%key, "wire keys collide; later value kept");
        }
    }
    wire
}

/// Rewrites every top-level key of `record` to storage case, preserving order.
pub fn to_storage_case(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value): (String, Value)| (storage_key(&key), value))
        .collect()
}

/// Applies [`to_wire_case`] to every record a payload carries.
///
/// Messages and faults carry no keys and pass through unchanged.
pub fn payload_to_wire_case(payload: Payload) -> Payload {
    match payload {
        Payload::Record(record) => Payload::Record(to_wire_case(record)),
        Payload::Records(records) => {
            Payload::Records(records.into_iter().map(to_wire_case).collect())
        }
        other => other,
    }
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
    fn test_storage_to_wire() {
        let input = record(json!({
            "id": 1,
            "representative_name": "Ada",
            "representative_email": "ada@example.com",
            "created_at": "2024-01-01T00:00:00"
        }));
        let output = to_wire_case(input);
        let keys: Vec<_> = output.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["id", "representativeName", "representativeEmail", "createdAt"]
        );
    }

    #[test]
    fn test_wire_case_is_idempotent() {
        let keys = [
            "sensor_device_uuid",
            "deviceUuid",
            "sensorID",
            "address_line_2",
            "_private",
            "already",
            "HTTPStatus",
            "min__value",
            "type",
        ];
        for key in keys {
            let once = wire_key(key);
            assert_eq!(wire_key(&once), once, "not idempotent for {key}");
        }

        let input = record(json!({"min_value": 1.5, "type_name": "co2", "id": 3}));
        let once = to_wire_case(input);
        assert_eq!(to_wire_case(once.clone()), once);
    }

    #[test]
    fn test_wire_case_is_idempotent_over_generated_keys() {
        const ALPHABET: [char; 7] = ['a', 'A', '_', '1', '-', '.', ' '];
        let mut keys: Vec<String> = vec![String::new()];
        let mut frontier = keys.clone();
        for _ in 0..5 {
            frontier = frontier
                .iter()
                .flat_map(|prefix| ALPHABET.iter().map(move |c| format!("{prefix}{c}")))
                .collect();
            keys.extend(frontier.iter().cloned());
        }
        keys.extend(
            ["1_a", "1-a", "a_ß", "İ", "x_ǆ", "ﬁ_ﬂ", "a_İ", "_ß_1"]
                .into_iter()
                .map(String::from),
        );

        for key in &keys {
            let once = wire_key(key);
            assert_eq!(wire_key(&once), once, "not idempotent for {key:?}");
        }

        let input: Record = keys
            .iter()
            .enumerate()
            .map(|(i, key)| (key.clone(), Value::from(i)))
            .collect();
        let once = to_wire_case(input);
        assert_eq!(to_wire_case(once.clone()), once);
    }

    #[test]
    fn test_digit_and_unicode_keys() {
        assert_eq!(wire_key("1_a"), "1A");
        assert_eq!(wire_key("address_line_2"), "addressLine2");
        assert_eq!(wire_key("a_ß"), "aSS");
        assert_eq!(wire_key("İ"), "İ");
        assert_eq!(wire_key("_private"), "private");
        assert_eq!(wire_key("min__value"), "minValue");
        assert_eq!(wire_key("trailing_"), "trailing");
    }

    #[test]
    fn test_colliding_keys_keep_the_later_value() {
        let input = record(json!({"room_id": 1, "roomId": 2, "id": 3}));
        let output = to_wire_case(input);
        assert_eq!(Value::Object(output), json!({"roomId": 2, "id": 3}));
    }

    #[test]
    fn test_nested_values_are_untouched() {
        let input = record(json!({"room_info": {"location_id": 4}}));
        let output = to_wire_case(input);
        assert_eq!(output["roomInfo"], json!({"location_id": 4}));
    }

    #[test]
    fn test_wire_to_storage() {
        let input = record(json!({"phoneNumber": "0612345678", "name": "Bob"}));
        let output = to_storage_case(input);
        assert!(output.contains_key("phone_number"));
        assert!(output.contains_key("name"));
    }

    #[test]
    fn test_payload_collections_are_normalized() {
        let rows = vec![
            record(json!({"room_id": 1})),
            record(json!({"room_id": 2})),
        ];
        let Payload::Records(out) = payload_to_wire_case(Payload::Records(rows)) else {
            panic!("expected records");
        };
        assert!(out.iter().all(|r| r.contains_key("roomId")));
    }

    #[test]
    fn test_messages_pass_through() {
        let payload = Payload::Message("item not found".into());
        assert_eq!(payload_to_wire_case(payload.clone()), payload);
    }
}
