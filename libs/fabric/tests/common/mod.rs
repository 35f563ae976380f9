#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tether_core::{RequestEnvelope, ResponseEnvelope};
use tether_fabric::bridge::{
    BridgeHandle, EmbeddedHost, EventHandler, HostContext, ReadyListener, ResponseCallback,
};

/// What the fake bridge does with a request
pub enum Reply {
    Respond(ResponseEnvelope),
    /// Keep the callback so the test can complete it later
    Hold,
    /// Drop the callback without calling it
    Drop,
}

type Responder = Box<dyn Fn(&RequestEnvelope) -> Reply + Send + Sync>;

pub struct FakeBridge {
    version: Option<String>,
    responder: Responder,
    pub init_calls: AtomicUsize,
    pub sent: Mutex<Vec<RequestEnvelope>>,
    pub held: Mutex<Vec<ResponseCallback>>,
    pub registered: Mutex<Vec<String>>,
    pub deregistered: Mutex<Vec<String>>,
}

impl FakeBridge {
    pub fn new(responder: impl Fn(&RequestEnvelope) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            version: Some("2.0".to_string()),
            responder: Box::new(responder),
            init_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            held: Mutex::new(Vec::new()),
            registered: Mutex::new(Vec::new()),
            deregistered: Mutex::new(Vec::new()),
        }
    }

    /// Bridge that answers every request with `data`
    pub fn answering(data: Value) -> Self {
        Self::new(move |request| Reply::Respond(ResponseEnvelope::success(request.kind.as_str(), data.clone())))
    }

    pub fn without_version(mut self) -> Self {
        self.version = None;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<RequestEnvelope> {
        self.sent.lock().unwrap().clone()
    }

    pub fn take_held(&self) -> Vec<ResponseCallback> {
        std::mem::take(&mut *self.held.lock().unwrap())
    }
}

impl BridgeHandle for FakeBridge {
    fn send(&self, request: RequestEnvelope, on_result: ResponseCallback) {
        let reply = (self.responder)(&request);
        self.sent.lock().unwrap().push(request);
        match reply {
            Reply::Respond(response) => on_result(response),
            Reply::Hold => self.held.lock().unwrap().push(on_result),
            Reply::Drop => drop(on_result),
        }
    }

    fn register_handler(&self, name: &str, _handler: EventHandler) {
        self.registered.lock().unwrap().push(name.to_string());
    }

    fn deregister_handler(&self, name: &str) {
        self.deregistered.lock().unwrap().push(name.to_string());
    }

    fn version(&self) -> Option<String> {
        self.version.clone()
    }

    fn init(&self) {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct FakeEmbeddedHost {
    bridge: Arc<FakeBridge>,
    pub calls: Mutex<Vec<&'static str>>,
}

impl FakeEmbeddedHost {
    pub fn new(bridge: Arc<FakeBridge>) -> Self {
        Self {
            bridge,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

impl EmbeddedHost for FakeEmbeddedHost {
    fn bridge(&self) -> Arc<dyn BridgeHandle> {
        self.bridge.clone()
    }

    fn add_sync_data_update_handler(&self, _handler: EventHandler) {
        self.record("add_sync_data_update_handler");
    }

    fn add_sync_finished_handler(&self, _handler: EventHandler) {
        self.record("add_sync_finished_handler");
    }

    fn remove_sync_data_update_handler(&self) {
        self.record("remove_sync_data_update_handler");
    }

    fn remove_sync_finished_handler(&self) {
        self.record("remove_sync_finished_handler");
    }
}

pub struct FakeContext {
    embedded: Option<Arc<FakeEmbeddedHost>>,
    discard_listener: bool,
    listener: Mutex<Option<ReadyListener>>,
    pub subscriptions: AtomicUsize,
    pub removals: AtomicUsize,
}

impl FakeContext {
    /// Standalone native container; the bridge arrives via [`FakeContext::deliver`]
    pub fn native() -> Self {
        Self {
            embedded: None,
            discard_listener: false,
            listener: Mutex::new(None),
            subscriptions: AtomicUsize::new(0),
            removals: AtomicUsize::new(0),
        }
    }

    /// Loaded inside an already-connected document
    pub fn embedded(host: Arc<FakeEmbeddedHost>) -> Self {
        Self {
            embedded: Some(host),
            ..Self::native()
        }
    }

    /// Native container that throws away the listener it is given
    pub fn discarding() -> Self {
        Self {
            discard_listener: true,
            ..Self::native()
        }
    }

    /// Fire the bridge-ready notification. Returns false when nobody listens.
    pub fn deliver(&self, bridge: Arc<FakeBridge>) -> bool {
        let listener = self.listener.lock().unwrap().take();
        match listener {
            Some(listener) => {
                listener(bridge as Arc<dyn BridgeHandle>);
                true
            }
            None => false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().unwrap().is_some()
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn removals(&self) -> usize {
        self.removals.load(Ordering::SeqCst)
    }
}

impl HostContext for FakeContext {
    fn embedded_host(&self) -> Option<Arc<dyn EmbeddedHost>> {
        self.embedded
            .clone()
            .map(|host| host as Arc<dyn EmbeddedHost>)
    }

    fn on_bridge_ready(&self, listener: ReadyListener) {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        if !self.discard_listener {
            *self.listener.lock().unwrap() = Some(listener);
        }
    }

    fn remove_bridge_ready_listener(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
        self.listener.lock().unwrap().take();
    }
}
