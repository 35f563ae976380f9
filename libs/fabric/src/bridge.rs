//! Capabilities the host application hands to the client
//!
//! None of these are implemented here. A native container provides a
//! [`BridgeHandle`] through the [`HostContext`] bridge-ready notification;
//! a parent document that is already connected exposes an [`EmbeddedHost`]
//! instead.

use std::sync::Arc;

use serde_json::Value;
use tether_core::{RequestEnvelope, ResponseEnvelope};

/// Completion callback for a single request. Called at most once.
pub type ResponseCallback = Box<dyn FnOnce(ResponseEnvelope) + Send>;

/// Handler for host-pushed events
pub type EventHandler = Arc<dyn Fn(Value) + Send + Sync>;

/// One-shot listener for the bridge-ready notification
pub type ReadyListener = Box<dyn FnOnce(Arc<dyn BridgeHandle>) + Send>;

/// Event pushed while a sync is delivering data
pub const SYNC_DATA_UPDATE_EVENT: &str = "syncDataUpdate";

/// Event pushed when a sync completes
pub const SYNC_FINISHED_EVENT: &str = "syncFinished";

/// The host's send primitive and event registry
pub trait BridgeHandle: Send + Sync {
    /// Submit a request; the host invokes `on_result` once with the response
    fn send(&self, request: RequestEnvelope, on_result: ResponseCallback);

    fn register_handler(&self, name: &str, handler: EventHandler);

    fn deregister_handler(&self, name: &str);

    /// Version marker. Older hosts expose none and need [`BridgeHandle::init`].
    fn version(&self) -> Option<String> {
        None
    }

    /// One-time activation required by hosts without a version marker
    fn init(&self) {}
}

/// A connection owned by an enclosing, already-connected document
pub trait EmbeddedHost: Send + Sync {
    fn bridge(&self) -> Arc<dyn BridgeHandle>;

    fn add_sync_data_update_handler(&self, handler: EventHandler);

    fn add_sync_finished_handler(&self, handler: EventHandler);

    fn remove_sync_data_update_handler(&self);

    fn remove_sync_finished_handler(&self);
}

/// The execution context the client was loaded into
pub trait HostContext: Send + Sync {
    /// The enclosing document's connection, if there is one
    fn embedded_host(&self) -> Option<Arc<dyn EmbeddedHost>>;

    /// Subscribe to the one-shot bridge-ready notification
    fn on_bridge_ready(&self, listener: ReadyListener);

    /// Drop the bridge-ready listener, delivered or not
    fn remove_bridge_ready_listener(&self);
}
