//! Tether Core - Wire data model shared by the bridge crates
//!
//! Holds the request/response envelopes exchanged with the host, the loose
//! record and schema shapes the host returns, and the boolean marshalling
//! used by the host boundary.

pub mod envelope;
pub mod error;
pub mod host_bool;
pub mod record;
pub mod schema;

// Re-exports for convenience
pub use envelope::{RequestEnvelope, RequestKind, ResponseEnvelope};
pub use error::{Error, Result};
pub use record::Record;
pub use schema::{FieldDescriptor, SchemaDescriptor};
