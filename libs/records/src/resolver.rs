use std::borrow::Cow;

use serde_json::Value;
use tether_core::record::{is_falsy, type_tag, ID_FIELD};
use tether_core::{FieldDescriptor, Record};
use tether_fabric::{Error, Result};
use tracing::debug;

use crate::source::RecordSource;

/// Resolves dotted relationship paths starting from a record
///
/// Missing data anywhere along the path (unknown relationship, empty
/// foreign key, unresolvable type, related record not found) resolves to
/// `None` rather than an error, so a legitimately null field and a missing
/// relationship look the same to the caller. Errors are reserved for a
/// malformed path and for failures of the [`RecordSource`] itself.
pub struct PathResolver<S> {
    source: S,
}

impl<S: RecordSource> PathResolver<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve `path` against `record`, an instance of `base_type`
    ///
    /// The path may start with `base_type` itself (`Contact.Owner.Name`).
    /// A path naming only the base type resolves to `None`.
    pub async fn resolve(&self, record: &Record, path: &str, base_type: &str) -> Result<Option<Value>> {
        let segments = segments(path, base_type)?;
        let Some((leaf, hops)) = segments.split_last() else {
            debug!(path, base_type, "path names only the base type");
            return Ok(None);
        };

        let mut current = Cow::Borrowed(record);
        let mut current_type = base_type.to_string();

        // Each hop strictly follows the previous one
        for relationship in hops {
            match self.hop(&current, &current_type, relationship).await? {
                Some((next, next_type)) => {
                    current = Cow::Owned(next);
                    current_type = next_type;
                }
                None => return Ok(None),
            }
        }

        Ok(current.get(*leaf).filter(|value| !value.is_null()).cloned())
    }

    /// Follow one relationship from `record`, or `None` when it leads nowhere
    async fn hop(
        &self,
        record: &Record,
        entity_type: &str,
        relationship: &str,
    ) -> Result<Option<(Record, String)>> {
        let schema = self.source.describe(entity_type).await?;
        let Some(field) = schema.relationship(relationship) else {
            debug!(entity_type, relationship, "no field backs this relationship");
            return Ok(None);
        };

        let Some(foreign_key) = record.get(&field.name).filter(|value| !is_falsy(value)) else {
            debug!(entity_type, field = %field.name, "foreign key is empty");
            return Ok(None);
        };
        let Some(id) = foreign_key_id(foreign_key) else {
            debug!(entity_type, field = %field.name, "foreign key carries no id");
            return Ok(None);
        };

        let Some(target) = target_type(field, record.get(relationship), foreign_key) else {
            debug!(entity_type, relationship, "cannot determine related entity type");
            return Ok(None);
        };

        let related = self.source.read_by_id(&target, id).await?;
        match related.into_iter().next() {
            Some(next) => Ok(Some((next, target))),
            None => {
                debug!(%target, id, "related record not found");
                Ok(None)
            }
        }
    }
}

/// Split a path into segments, dropping a leading base type qualifier
fn segments<'a>(path: &'a str, base_type: &str) -> Result<Vec<&'a str>> {
    if path.is_empty() {
        return Err(Error::invalid_argument("path must not be empty"));
    }
    if base_type.is_empty() {
        return Err(Error::invalid_argument("base type must not be empty"));
    }

    let mut segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::invalid_argument(format!(
            "path {:?} contains an empty segment",
            path
        )));
    }

    if segments.first() == Some(&base_type) {
        segments.remove(0);
    }
    Ok(segments)
}

fn foreign_key_id(foreign_key: &Value) -> Option<&str> {
    let id = match foreign_key {
        Value::String(id) => id.as_str(),
        Value::Object(expanded) => expanded.get(ID_FIELD).and_then(Value::as_str)?,
        _ => return None,
    };
    Some(id).filter(|id| !id.trim().is_empty())
}

/// Entity type the relationship points at for this particular record
///
/// Polymorphic relationships take the type from the expanded relationship
/// object, then from a tag on the foreign key value, then fall back to the
/// first declared target. A hint naming an undeclared target is rejected.
fn target_type(field: &FieldDescriptor, expanded: Option<&Value>, foreign_key: &Value) -> Option<String> {
    match field.reference_to.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        [first, ..] => {
            let hint = expanded.and_then(type_tag).or_else(|| type_tag(foreign_key));
            match hint {
                Some(hint) if field.references(hint) => Some(hint.to_string()),
                Some(_) => None,
                None => Some(first.clone()),
            }
        }
    }
}
