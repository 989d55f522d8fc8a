use serde_json::{Map, Value};

/// Session fields forwarded upstream; everything else the caller sends is dropped.
pub const SESSION_FIELDS: [&str; 6] = ["duration", "ueId", "asId", "uePorts", "asPorts", "qos"];

/// Project a caller payload onto the session allow-list.
///
/// Present values are copied unchanged, absent ones are omitted. A non-object
/// payload projects to an empty object.
pub fn project_session_payload(payload: &Value) -> Value {
    let mut projected = Map::new();
    if let Some(fields) = payload.as_object() {
        for key in SESSION_FIELDS {
            if let Some(value) = fields.get(key) {
                projected.insert(key.to_string(), value.clone());
            }
        }
    }
    Value::Object(projected)
}
