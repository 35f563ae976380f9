//! Response normalization
//!
//! Depending on the host release, some operations deliver their payload
//! either as a structured value or as the same value serialized to a JSON
//! string. [`normalize`] accepts both.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Structured shape an operation expects from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Object,
    Array,
}

impl Shape {
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Shape::Object => value.is_object(),
            Shape::Array => value.is_array(),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Object => f.write_str("object"),
            Shape::Array => f.write_str("array"),
        }
    }
}

/// Name of the JSON kind of `value`, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accept a payload of `shape` or its legacy serialized-string form
pub fn normalize(shape: Shape, response: Value) -> Result<Value> {
    match response {
        value if shape.matches(&value) => Ok(value),
        Value::String(text) => serde_json::from_str(&text)
            .map_err(|_| Error::response_shape("parse failure")),
        other => Err(Error::response_shape(format!(
            "expected {}, received {}",
            shape,
            value_kind(&other)
        ))),
    }
}

/// Normalize, then deserialize into a typed payload
pub fn decode<T: DeserializeOwned>(shape: Shape, response: Value) -> Result<T> {
    let value = normalize(shape, response)?;
    serde_json::from_value(value).map_err(|e| Error::response_shape(e.to_string()))
}
