//! Tether Fabric - Host bridge session and transport layer
//!
//! Establishes the connection to the host application (adopting an
//! enclosing document's bridge or waiting for a native container to hand
//! one over) and funnels every request through a single request/response
//! channel.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tether_fabric::{bridge::HostContext, request::Read, Session};
//!
//! # async fn example(context: Arc<dyn HostContext>) -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(context);
//! session.connect().await?;
//!
//! let users = session.call(Read::by_id("User", "005X")).await?;
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod channel;
pub mod codec;
pub mod error;
pub mod request;
pub mod session;

// Re-exports for convenience
pub use channel::Channel;
pub use error::{Error, Result};
pub use request::Operation;
pub use session::{ConnectionState, Session, SessionBuilder};
