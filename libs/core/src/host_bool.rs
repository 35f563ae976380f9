//! Boolean marshalling for the host boundary
//!
//! Hosts exchange booleans as the strings `"TRUE"` and `"FALSE"`. Use this
//! module as `#[serde(with = "tether_core::host_bool")]` on boundary payload
//! fields so everything past the boundary sees a plain `bool`.

use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use serde_json::Value;

pub const TRUE: &str = "TRUE";
pub const FALSE: &str = "FALSE";

pub fn encode(value: bool) -> &'static str {
    if value {
        TRUE
    } else {
        FALSE
    }
}

/// Decode a host boolean; native JSON booleans are accepted as well
pub fn decode(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse(s),
        _ => None,
    }
}

fn parse(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case(TRUE) {
        Some(true)
    } else if s.eq_ignore_ascii_case(FALSE) {
        Some(false)
    } else {
        None
    }
}

pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(encode(*value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    deserializer.deserialize_any(HostBoolVisitor)
}

struct HostBoolVisitor;

impl<'de> Visitor<'de> for HostBoolVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str("\"TRUE\", \"FALSE\" or a boolean")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}
