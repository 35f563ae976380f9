//! Tether Records - Relationship path resolution over host records
//!
//! Walks dotted field paths such as `Owner.Manager.Name` across related
//! records, using the host's schema service to find each foreign key and
//! the host's record store to fetch each related record.

pub mod resolver;
pub mod source;

// Re-exports for convenience
pub use resolver::PathResolver;
pub use source::RecordSource;
