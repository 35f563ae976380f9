use serde_json::{Map, Value};

/// A record as delivered by the host: field name to loosely typed value
pub type Record = Map<String, Value>;

/// Primary key field present on every record
pub const ID_FIELD: &str = "Id";

/// Key of the attributes block hosts attach to expanded records
pub const ATTRIBUTES_FIELD: &str = "attributes";

/// Key of the entity type inside an attributes block
pub const TYPE_ATTRIBUTE: &str = "type";

/// Read the primary key of a record
pub fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

/// Read the `attributes.type` tag carried by an expanded record value
pub fn type_tag(value: &Value) -> Option<&str> {
    value
        .get(ATTRIBUTES_FIELD)?
        .get(TYPE_ATTRIBUTE)?
        .as_str()
        .filter(|tag| !tag.is_empty())
}

/// Whether a host value counts as "no value"
///
/// Null, `false`, zero and the empty string are all treated as absent.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
