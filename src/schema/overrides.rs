//! Enum overrides for hand-written or inferred schemas
//!
//! Test fixtures pin expected literal values (a phone number just registered,
//! `exist: false`, …) onto a schema's property map without rewriting the schema.

use serde_json::{Map, Value};

/// Normalise an override value into an `enum` list
pub(crate) fn enum_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(values) => values.clone(),
        other => vec![other.clone()],
    }
}

/// Set `enum` on every property named in `overrides`.
///
/// `properties` is the `properties` object of a JSON schema. Fields that are
/// not in `properties`, or whose schema is not an object, are skipped, so an
/// override map can be broader than the schema it is applied to. An existing
/// `enum` is replaced.
pub fn apply_enum_overrides(properties: &mut Map<String, Value>, overrides: &Map<String, Value>) {
    for (field, value) in overrides {
        if let Some(Value::Object(field_schema)) = properties.get_mut(field) {
            field_schema.insert("enum".to_string(), Value::Array(enum_list(value)));
        }
    }
}

/// Apply overrides to the top-level `properties` of a schema document.
///
/// Returns `false` when the document has no `properties` object.
pub fn apply_enum_overrides_to_schema(schema: &mut Value, overrides: &Map<String, Value>) -> bool {
    match schema.get_mut("properties") {
        Some(Value::Object(properties)) => {
            apply_enum_overrides(properties, overrides);
            true
        }
        _ => false,
    }
}
