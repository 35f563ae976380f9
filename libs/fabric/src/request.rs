//! Typed operations
//!
//! Each operation builds its own request envelope and decodes its own
//! response payload, so callers of [`Session::call`](crate::Session::call)
//! never handle loose envelopes.

use serde::Serialize;
use serde_json::Value;
use tether_core::record::{record_id, ID_FIELD};
use tether_core::{host_bool, Record, RequestEnvelope, RequestKind, SchemaDescriptor};

use crate::codec::{self, value_kind, Shape};
use crate::error::{Error, Result};

/// A request kind with a typed response
pub trait Operation {
    type Output;

    /// Validate arguments and build the envelope sent to the host
    fn envelope(&self) -> Result<RequestEnvelope>;

    /// Decode the host's successful response payload
    fn decode(&self, data: Value) -> Result<Self::Output>;
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(format!("{} must not be empty", what)));
    }
    Ok(())
}

/// Insert a new record
#[derive(Debug, Clone)]
pub struct Create {
    pub object: String,
    pub fields: Record,
}

impl Create {
    pub fn new(object: impl Into<String>, fields: Record) -> Self {
        Self {
            object: object.into(),
            fields,
        }
    }
}

impl Operation for Create {
    /// Id of the created record
    type Output = String;

    fn envelope(&self) -> Result<RequestEnvelope> {
        require(&self.object, "object")?;
        if self.fields.is_empty() {
            return Err(Error::invalid_argument("fields must not be empty"));
        }
        Ok(RequestEnvelope::new(RequestKind::Create)
            .object(&self.object)
            .data(Value::Object(self.fields.clone())))
    }

    fn decode(&self, data: Value) -> Result<String> {
        match data {
            Value::String(id) if !id.is_empty() => Ok(id),
            Value::Object(record) => record_id(&record)
                .map(str::to_string)
                .ok_or_else(|| Error::response_shape("created record has no Id")),
            other => Err(Error::response_shape(format!(
                "expected record id, received {}",
                value_kind(&other)
            ))),
        }
    }
}

/// Query records of one entity type by field values
#[derive(Debug, Clone)]
pub struct Read {
    pub object: String,
    pub filter: Record,
}

impl Read {
    pub fn new(object: impl Into<String>, filter: Record) -> Self {
        Self {
            object: object.into(),
            filter,
        }
    }

    /// Look a record up by primary key
    pub fn by_id(object: impl Into<String>, id: impl Into<String>) -> Self {
        let mut filter = Record::new();
        filter.insert(ID_FIELD.to_string(), Value::String(id.into()));
        Self::new(object, filter)
    }
}

impl Operation for Read {
    type Output = Vec<Record>;

    fn envelope(&self) -> Result<RequestEnvelope> {
        require(&self.object, "object")?;
        if self.filter.is_empty() {
            return Err(Error::invalid_argument("filter must not be empty"));
        }
        if let Some(id) = self.filter.get(ID_FIELD) {
            let id = id
                .as_str()
                .ok_or_else(|| Error::invalid_argument(format!("{} must be a string", ID_FIELD)))?;
            require(id, ID_FIELD)?;
        }
        Ok(RequestEnvelope::new(RequestKind::Read)
            .object(&self.object)
            .args(self.filter.clone()))
    }

    fn decode(&self, data: Value) -> Result<Vec<Record>> {
        codec::decode(Shape::Array, data)
    }
}

/// Change fields of an existing record
#[derive(Debug, Clone)]
pub struct Update {
    pub object: String,
    pub id: String,
    pub fields: Record,
}

impl Update {
    pub fn new(object: impl Into<String>, id: impl Into<String>, fields: Record) -> Self {
        Self {
            object: object.into(),
            id: id.into(),
            fields,
        }
    }
}

impl Operation for Update {
    type Output = ();

    fn envelope(&self) -> Result<RequestEnvelope> {
        require(&self.object, "object")?;
        require(&self.id, ID_FIELD)?;
        if self.fields.is_empty() {
            return Err(Error::invalid_argument("fields must not be empty"));
        }
        Ok(RequestEnvelope::new(RequestKind::Update)
            .object(&self.object)
            .arg(ID_FIELD, self.id.as_str())
            .data(Value::Object(self.fields.clone())))
    }

    fn decode(&self, _data: Value) -> Result<()> {
        Ok(())
    }
}

/// Remove a record
#[derive(Debug, Clone)]
pub struct Delete {
    pub object: String,
    pub id: String,
}

impl Delete {
    pub fn new(object: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            id: id.into(),
        }
    }
}

impl Operation for Delete {
    /// Whether the host removed the record
    type Output = bool;

    fn envelope(&self) -> Result<RequestEnvelope> {
        require(&self.object, "object")?;
        require(&self.id, ID_FIELD)?;
        Ok(RequestEnvelope::new(RequestKind::Delete)
            .object(&self.object)
            .arg(ID_FIELD, self.id.as_str()))
    }

    fn decode(&self, data: Value) -> Result<bool> {
        host_bool::decode(&data).ok_or_else(|| {
            Error::response_shape(format!(
                "expected host boolean, received {}",
                value_kind(&data)
            ))
        })
    }
}

/// Fetch the field layout of an entity type
#[derive(Debug, Clone)]
pub struct Describe {
    pub object: String,
}

impl Describe {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
        }
    }
}

impl Operation for Describe {
    type Output = SchemaDescriptor;

    fn envelope(&self) -> Result<RequestEnvelope> {
        require(&self.object, "object")?;
        Ok(RequestEnvelope::new(RequestKind::Describe).object(&self.object))
    }

    fn decode(&self, data: Value) -> Result<SchemaDescriptor> {
        codec::decode(Shape::Object, data)
    }
}

/// Ask the host to synchronize its local data
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncData {
    /// Full resync instead of an incremental one
    pub full: bool,
}

#[derive(Serialize)]
struct SyncArgs {
    #[serde(with = "tether_core::host_bool")]
    full: bool,
}

impl SyncData {
    pub fn incremental() -> Self {
        Self { full: false }
    }

    pub fn full() -> Self {
        Self { full: true }
    }
}

impl Operation for SyncData {
    type Output = ();

    fn envelope(&self) -> Result<RequestEnvelope> {
        Ok(RequestEnvelope::new(RequestKind::Sync).args_from(&SyncArgs { full: self.full })?)
    }

    fn decode(&self, _data: Value) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn read_by_id_builds_filtered_envelope() {
        let envelope = Read::by_id("User", "005X").envelope().unwrap();
        assert_eq!(envelope.kind, RequestKind::Read);
        assert_eq!(envelope.object.as_deref(), Some("User"));
        assert_eq!(envelope.args, Some(record(json!({ "Id": "005X" }))));
    }

    #[test]
    fn empty_arguments_are_rejected() {
        assert!(matches!(Read::by_id("", "005X").envelope(), Err(Error::InvalidArgument(_))));
        assert!(matches!(Read::by_id("User", "").envelope(), Err(Error::InvalidArgument(_))));
        assert!(matches!(Describe::new(" ").envelope(), Err(Error::InvalidArgument(_))));
        assert!(matches!(Delete::new("Account", "").envelope(), Err(Error::InvalidArgument(_))));
        assert!(matches!(
            Create::new("Account", Record::new()).envelope(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_string_id_filter_is_rejected() {
        let mut filter = Record::new();
        filter.insert(ID_FIELD.to_string(), json!(42));

        match Read::new("User", filter).envelope() {
            Err(Error::InvalidArgument(msg)) => assert!(msg.contains("must be a string")),
            other => panic!("Expected InvalidArgument, got {:?}", other),
        }
    }

    #[test]
    fn sync_marshals_host_boolean() {
        let envelope = SyncData::full().envelope().unwrap();
        assert_eq!(envelope.args, Some(record(json!({ "full": "TRUE" }))));
    }

    #[test]
    fn delete_decodes_host_boolean() {
        let delete = Delete::new("Account", "001");
        assert!(delete.decode(json!("TRUE")).unwrap());
        assert!(!delete.decode(json!(false)).unwrap());
        assert!(matches!(delete.decode(json!(null)), Err(Error::ResponseShape(_))));
    }

    #[test]
    fn create_accepts_id_or_record() {
        let create = Create::new("Account", record(json!({ "Name": "Acme" })));
        assert_eq!(create.decode(json!("001A")).unwrap(), "001A");
        assert_eq!(create.decode(json!({ "Id": "001B" })).unwrap(), "001B");
        assert!(create.decode(json!({})).is_err());
    }

    #[test]
    fn describe_accepts_legacy_string() {
        let schema = Describe::new("Contact")
            .decode(json!(r#"{"fields":{"OwnerId":{"name":"OwnerId","relationshipName":"Owner","referenceTo":["User"]}}}"#))
            .unwrap();
        assert_eq!(schema.relationship("Owner").unwrap().name, "OwnerId");
    }
}
