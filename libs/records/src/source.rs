use std::sync::Arc;

use async_trait::async_trait;
use tether_core::{Record, SchemaDescriptor};
use tether_fabric::request::{Describe, Read};
use tether_fabric::{Result, Session};

/// Schema and record lookups the path resolver depends on
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Field layout of `entity_type`
    async fn describe(&self, entity_type: &str) -> Result<SchemaDescriptor>;

    /// Records of `entity_type` whose primary key is `id`
    async fn read_by_id(&self, entity_type: &str, id: &str) -> Result<Vec<Record>>;
}

#[async_trait]
impl RecordSource for Session {
    async fn describe(&self, entity_type: &str) -> Result<SchemaDescriptor> {
        self.call(Describe::new(entity_type)).await
    }

    async fn read_by_id(&self, entity_type: &str, id: &str) -> Result<Vec<Record>> {
        self.call(Read::by_id(entity_type, id)).await
    }
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn describe(&self, entity_type: &str) -> Result<SchemaDescriptor> {
        (**self).describe(entity_type).await
    }

    async fn read_by_id(&self, entity_type: &str, id: &str) -> Result<Vec<Record>> {
        (**self).read_by_id(entity_type, id).await
    }
}
