use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Kind tag of a response envelope that signals failure
pub const ERROR_KIND: &str = "error";

/// Message used when the host reports an error without any detail
pub const GENERIC_ERROR_MESSAGE: &str = "An unknown error occurred in the host application";

/// Every request kind the host bridge understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    Create,
    Read,
    Update,
    Delete,
    Describe,
    Sync,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Create => "create",
            RequestKind::Read => "read",
            RequestKind::Update => "update",
            RequestKind::Delete => "delete",
            RequestKind::Describe => "describe",
            RequestKind::Sync => "sync",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request handed to the host bridge
///
/// Built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub kind: RequestKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Map<String, Value>>,

    #[serde(default)]
    pub data: Value,
}

impl RequestEnvelope {
    /// Create an empty envelope of the given kind
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            object: None,
            field_name: None,
            args: None,
            data: Value::Null,
        }
    }

    /// Set the entity type the request targets
    pub fn object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Set the field the request targets
    pub fn field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    /// Replace the argument map
    pub fn args(mut self, args: Map<String, Value>) -> Self {
        self.args = Some(args);
        self
    }

    /// Add a single argument
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Set the request payload
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the arguments from a serializable struct
    ///
    /// The value must serialize to a JSON object.
    pub fn args_from<T: Serialize>(mut self, args: &T) -> Result<Self> {
        match serde_json::to_value(args)? {
            Value::Object(map) => {
                self.args = Some(map);
                Ok(self)
            }
            other => Err(Error::invalid_argument(format!(
                "request arguments must serialize to an object, got {}",
                other
            ))),
        }
    }
}

/// A single response delivered by the host bridge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub kind: String,

    #[serde(default)]
    pub data: Value,
}

impl ResponseEnvelope {
    /// Successful response carrying `data`
    pub fn success(kind: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Failure response carrying `data` as the message
    pub fn error(data: impl Into<Value>) -> Self {
        Self {
            kind: ERROR_KIND.to_string(),
            data: data.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == ERROR_KIND
    }

    /// Split the envelope into its payload or its failure message
    pub fn into_outcome(self) -> std::result::Result<Value, String> {
        if !self.is_error() {
            return Ok(self.data);
        }

        let message = match self.data {
            Value::Null => GENERIC_ERROR_MESSAGE.to_string(),
            Value::String(message) if message.is_empty() => GENERIC_ERROR_MESSAGE.to_string(),
            Value::String(message) => message,
            other => other.to_string(),
        };
        Err(message)
    }
}
