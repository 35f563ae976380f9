use std::sync::Arc;

use serde_json::Value;
use tether_core::RequestEnvelope;
use tokio::sync::oneshot;
use tracing::debug;

use crate::bridge::BridgeHandle;
use crate::error::{Error, Result};

/// Request/response channel over the host's callback-style send primitive
///
/// Every exchange with the host passes through [`Channel::send`]. There is no
/// timeout, retry or request id: the host is trusted to invoke each
/// request's own callback exactly once.
#[derive(Clone)]
pub struct Channel {
    bridge: Arc<dyn BridgeHandle>,
}

impl Channel {
    /// Create a channel over a captured bridge handle
    pub fn new(bridge: Arc<dyn BridgeHandle>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<dyn BridgeHandle> {
        &self.bridge
    }

    /// Send a request and wait for the host to complete it
    pub async fn send(&self, request: RequestEnvelope) -> Result<Value> {
        let kind = request.kind;
        let (result_tx, result_rx) = oneshot::channel();

        self.bridge.send(
            request,
            Box::new(move |response| {
                let _ = result_tx.send(response);
            }),
        );

        // A dropped callback is the only way to observe a host that gave up
        let response = result_rx.await.map_err(|_| Error::ConnectionClosed)?;

        response.into_outcome().map_err(|message| {
            debug!(%kind, %message, "host rejected request");
            Error::Transport(message)
        })
    }
}
