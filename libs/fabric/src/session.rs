use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tether_core::RequestEnvelope;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::bridge::{
    BridgeHandle, EmbeddedHost, EventHandler, HostContext, SYNC_DATA_UPDATE_EVENT,
    SYNC_FINISHED_EVENT,
};
use crate::channel::Channel;
use crate::error::{Error, Result};
use crate::request::Operation;

/// How long a native handshake waits for the bridge-ready notification
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Lifecycle of a session's connection to the host
///
/// `Uninitialized -> AwaitingHandshake -> Ready | Failed`. Both `Ready` and
/// `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    AwaitingHandshake,
    Ready,
    Failed,
}

#[derive(Clone)]
struct Connection {
    channel: Channel,
    embedded: Option<Arc<dyn EmbeddedHost>>,
}

enum Link {
    Uninitialized,
    AwaitingHandshake,
    Ready(Connection),
    Failed,
}

impl Link {
    fn state(&self) -> ConnectionState {
        match self {
            Link::Uninitialized => ConnectionState::Uninitialized,
            Link::AwaitingHandshake => ConnectionState::AwaitingHandshake,
            Link::Ready(_) => ConnectionState::Ready,
            Link::Failed => ConnectionState::Failed,
        }
    }
}

/// A client session with the host application
///
/// Owns the connection state and, once the handshake completes, the bridge
/// handle. All requests go through [`Session::send`].
pub struct Session {
    context: Arc<dyn HostContext>,
    handshake_timeout: Duration,
    link: Mutex<Link>,
}

impl Session {
    /// Create a session with default settings
    pub fn new(context: Arc<dyn HostContext>) -> Self {
        Self::builder().build(context)
    }

    /// Create a builder for configuring the session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn state(&self) -> ConnectionState {
        self.lock().state()
    }

    pub fn handshake_timeout(&self) -> Duration {
        self.handshake_timeout
    }

    /// Whether the session adopted an enclosing document's connection
    pub fn is_embedded(&self) -> bool {
        matches!(&*self.lock(), Link::Ready(connection) if connection.embedded.is_some())
    }

    /// Establish the connection to the host
    ///
    /// Adopts the enclosing document's bridge when one exists. Otherwise
    /// waits for the host's bridge-ready notification, up to the handshake
    /// timeout. Only the first call does anything; later calls fail with
    /// [`Error::AlreadyConnected`] and leave the state alone.
    pub async fn connect(&self) -> Result<()> {
        {
            let mut link = self.lock();
            if !matches!(*link, Link::Uninitialized) {
                debug!(state = ?link.state(), "connect rejected");
                return Err(Error::AlreadyConnected);
            }
            *link = Link::AwaitingHandshake;
        }
        debug!("awaiting host bridge");

        if let Some(embedded) = self.context.embedded_host() {
            let channel = Channel::new(embedded.bridge());
            info!(path = "embedded", version = ?channel.bridge().version(), "host bridge ready");
            self.set_link(Link::Ready(Connection {
                channel,
                embedded: Some(embedded),
            }));
            return Ok(());
        }

        match self.await_native_bridge().await {
            Ok(bridge) => {
                info!(path = "native", version = ?bridge.version(), "host bridge ready");
                self.set_link(Link::Ready(Connection {
                    channel: Channel::new(bridge),
                    embedded: None,
                }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "host bridge handshake failed");
                self.set_link(Link::Failed);
                Err(e)
            }
        }
    }

    async fn await_native_bridge(&self) -> Result<Arc<dyn BridgeHandle>> {
        let (ready_tx, ready_rx) = oneshot::channel();
        self.context.on_bridge_ready(Box::new(move |bridge| {
            let _ = ready_tx.send(bridge);
        }));
        let mut pending = PendingHandshake {
            session: self,
            settled: false,
        };

        // The losing branch is dropped here; with the receiver gone a late
        // notification has nowhere to land
        let outcome = tokio::select! {
            delivered = ready_rx => delivered.map_err(|_| Error::ConnectionClosed),
            _ = tokio::time::sleep(self.handshake_timeout) => {
                Err(Error::HandshakeTimeout(self.handshake_timeout))
            }
        };
        pending.settled = true;
        drop(pending);

        let bridge = outcome?;
        if bridge.version().is_none() {
            debug!("bridge has no version marker, activating");
            bridge.init();
        }
        Ok(bridge)
    }

    /// Send a raw request envelope to the host
    pub async fn send(&self, request: RequestEnvelope) -> Result<Value> {
        let connection = self.connection()?;
        connection.channel.send(request).await
    }

    /// Run a typed operation
    ///
    /// Arguments are validated before anything reaches the host.
    pub async fn call<O: Operation>(&self, operation: O) -> Result<O::Output> {
        let request = operation.envelope()?;
        let data = self.send(request).await?;
        operation.decode(data)
    }

    /// Subscribe to a host-pushed event
    ///
    /// Sync events go to the enclosing document when the session adopted
    /// its connection.
    pub fn register_handler(&self, name: &str, handler: EventHandler) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_argument("event name must not be empty"));
        }
        let connection = self.connection()?;

        match (&connection.embedded, name) {
            (Some(embedded), SYNC_DATA_UPDATE_EVENT) => embedded.add_sync_data_update_handler(handler),
            (Some(embedded), SYNC_FINISHED_EVENT) => embedded.add_sync_finished_handler(handler),
            _ => connection.channel.bridge().register_handler(name, handler),
        }
        Ok(())
    }

    /// Drop the subscription for a host-pushed event
    pub fn deregister_handler(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::invalid_argument("event name must not be empty"));
        }
        let connection = self.connection()?;

        match (&connection.embedded, name) {
            (Some(embedded), SYNC_DATA_UPDATE_EVENT) => embedded.remove_sync_data_update_handler(),
            (Some(embedded), SYNC_FINISHED_EVENT) => embedded.remove_sync_finished_handler(),
            _ => connection.channel.bridge().deregister_handler(name),
        }
        Ok(())
    }

    fn connection(&self) -> Result<Connection> {
        match &*self.lock() {
            Link::Ready(connection) => Ok(connection.clone()),
            _ => Err(Error::NotConnected),
        }
    }

    fn set_link(&self, link: Link) {
        let mut current = self.lock();
        debug!(from = ?current.state(), to = ?link.state(), "connection state changed");
        *current = link;
    }

    fn lock(&self) -> MutexGuard<'_, Link> {
        self.link.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Listener registration of a native handshake in progress
///
/// Dropping it removes the listener. If the `connect()` future is dropped
/// before the race settles, the session moves to `Failed`.
struct PendingHandshake<'a> {
    session: &'a Session,
    settled: bool,
}

impl Drop for PendingHandshake<'_> {
    fn drop(&mut self) {
        self.session.context.remove_bridge_ready_listener();
        if !self.settled {
            warn!("host bridge handshake abandoned before it settled");
            self.session.set_link(Link::Failed);
        }
    }
}

/// Builder for configuring a session
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    handshake_timeout: Duration,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
        }
    }
}

impl SessionBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how long the native handshake waits for the host
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Build the session for the given host context
    pub fn build(self, context: Arc<dyn HostContext>) -> Session {
        Session {
            context,
            handshake_timeout: self.handshake_timeout,
            link: Mutex::new(Link::Uninitialized),
        }
    }
}
