//! Response envelope schemas
//!
//! Every account-service endpoint answers `{"ok": bool, "reason": string, "data": …}`.

use serde_json::{json, Value};

/// Schema of a successful response wrapping `data_schema`
pub fn ok_schema(data_schema: Value) -> Value {
    json!({
        "type": "object",
        "properties": {
            "data": data_schema,
            "ok": { "type": "boolean", "enum": [true] },
            "reason": { "type": "string", "enum": [""] }
        },
        "required": ["ok", "reason", "data"]
    })
}

/// Schema of a successful response whose data is any object
pub fn ok_object_schema() -> Value {
    ok_schema(json!({ "type": "object" }))
}

/// Schema of a failed response with the given `reason`
pub fn fail_schema(reason: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "data": { "type": "object" },
            "ok": { "type": "boolean", "enum": [false] },
            "reason": { "type": "string", "enum": [reason] }
        },
        "required": ["ok", "reason"]
    })
}
