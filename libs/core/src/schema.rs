use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Field layout of one entity type, as reported by the host's schema service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Field descriptors keyed by field API name
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, keyed by its own name
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.insert(field.name.clone(), field);
        self
    }

    /// Find the field that backs the relationship `name`
    pub fn relationship(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .values()
            .find(|field| field.relationship_name.as_deref() == Some(name))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_name: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub reference_to: Vec<String>,
}

impl FieldDescriptor {
    /// A plain, non-relationship field
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relationship_name: None,
            reference_to: Vec::new(),
        }
    }

    /// A foreign key field exposed as relationship `relationship_name`
    pub fn relationship<I, S>(name: impl Into<String>, relationship_name: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            relationship_name: Some(relationship_name.into()),
            reference_to: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn references(&self, entity_type: &str) -> bool {
        self.reference_to.iter().any(|target| target == entity_type)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
