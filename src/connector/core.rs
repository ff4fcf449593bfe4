//! Connector core: provider registry, request dispatch and response correlation.
//!
//! # Request Cycle
//!
//! 1. [`Connector::send_message`] validates the command and provider
//! 2. A fresh [`RequestId`] and its responder enter the pending table
//! 3. `{params, requestId}` is published on the provider channel
//! 4. The provider posts `{result, error, requestId}` on the main channel
//! 5. The response listener takes the pending entry and resolves it
//!
//! Responses are matched by id only, so they may arrive in any order.

// ============================================================================
// Imports
// ============================================================================

use std::sync::{Arc, Weak};
use std::time::Duration;

use futures_util::FutureExt;
use parking_lot::{Mutex, RwLock};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, trace, warn};

use crate::bus::{EventBus, Listener};
use crate::discovery::{DiscoveryEvent, PluginInfo, StationDiscovery};
use crate::error::{Error, Result};
use crate::identifiers::{ChannelName, RequestId, SubscriptionId};
use crate::protocol::{
    Command, REGISTER_EVENT, RESPONSE_EVENT, RegisterMessage, RequestMessage, ResponseMessage,
};

use super::builder::ConnectorBuilder;
use super::pending::{PendingRequests, PendingResponse, Responder};
use super::registry::ProviderRegistry;

// ============================================================================
// Inner
// ============================================================================

/// State shared by all clones of a [`Connector`] and its bus listeners.
struct Inner {
    bus: Arc<dyn EventBus>,
    bus_id: String,
    main_channel: ChannelName,
    registry: RwLock<ProviderRegistry>,
    pending: Mutex<PendingRequests>,
    request_timeout: Option<Duration>,
    discovery: Option<Arc<StationDiscovery>>,
    register_subscription: Mutex<Option<SubscriptionId>>,
    response_subscription: Mutex<Option<SubscriptionId>>,
    discovery_subscription: Mutex<Option<SubscriptionId>>,
}

impl Inner {
    fn handle_register(&self, payload: &Value) {
        let message = match RegisterMessage::deserialize(payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Malformed register payload");
                return;
            }
        };

        let channel = ChannelName::for_provider(&self.bus_id, &message.provider_name);
        let replaced = self
            .registry
            .write()
            .register(message.provider_name.as_str(), channel.clone());

        debug!(
            provider = %message.provider_name,
            %channel,
            replaced = replaced.is_some(),
            "Provider registered"
        );
    }

    fn handle_response(&self, payload: &Value) {
        let response = match ResponseMessage::deserialize(payload) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Malformed response payload");
                return;
            }
        };

        let request_id = response.request_id;
        let Some(responder) = self.pending.lock().take(&request_id) else {
            warn!(%request_id, "Request Id not found in pending request map");
            return;
        };

        trace!(%request_id, failed = response.error.is_some(), "Response received");
        responder.resolve(response.into_result());
    }

    fn handle_discovery(&self, provider_name: &str, event: &DiscoveryEvent) {
        let mut registry = self.registry.write();
        match event {
            DiscoveryEvent::Discovered(info) => {
                let channel = ChannelName::for_provider(&self.bus_id, provider_name);
                registry.register_discovered(provider_name, channel, info.clone());
                debug!(provider = provider_name, "Station provider listed");
            }
            DiscoveryEvent::Disconnected => {
                registry.remove(provider_name);
                debug!(provider = provider_name, "Station provider delisted");
            }
        }
    }

    fn dispatch<P: Serialize>(
        &self,
        provider_name: &str,
        command: Command,
        params: P,
        responder: Responder,
    ) -> Result<RequestId> {
        let channel = self
            .registry
            .read()
            .channel(provider_name)
            .filter(|channel| self.bus.has_channel(channel))
            .cloned()
            .ok_or_else(|| Error::provider_not_registered(provider_name))?;

        let params = serde_json::to_value(params)?;
        let request_id = RequestId::generate();
        let payload = serde_json::to_value(RequestMessage::new(request_id, params))?;

        // Stored before publishing: a provider may answer synchronously.
        self.pending.lock().insert(request_id, responder);

        let delivered = self.bus.publish(&channel, command.as_str(), &payload);
        if delivered == 0 {
            self.pending.lock().take(&request_id);
            warn!(provider = provider_name, %channel, %command, "No listener on provider channel");
            return Err(Error::dispatch_failed(channel));
        }

        debug!(provider = provider_name, %command, %request_id, "Request dispatched");
        Ok(request_id)
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let subscriptions = [
            self.register_subscription.get_mut().take(),
            self.response_subscription.get_mut().take(),
        ];
        for id in subscriptions.into_iter().flatten() {
            self.bus.unsubscribe(id);
        }

        if let (Some(discovery), Some(id)) =
            (&self.discovery, self.discovery_subscription.get_mut().take())
        {
            discovery.off(id);
        }

        let pending = self.pending.get_mut().len();
        if pending > 0 {
            debug!(pending, "Connector dropped with unanswered requests");
        }
    }
}

// ============================================================================
// PendingGuard
// ============================================================================

/// Owned by a [`PendingResponse`]; removes its entry if it is still
/// unanswered when the response goes away.
struct PendingGuard {
    inner: Weak<Inner>,
    request_id: RequestId,
}

impl PendingGuard {
    /// Removes the entry. Returns `false` if it was already answered.
    fn cancel(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.pending.lock().take(&self.request_id).is_some())
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if self.cancel() {
            debug!(request_id = %self.request_id, "Pending response dropped unanswered");
        }
    }
}

// ============================================================================
// Connector
// ============================================================================

/// Single entry point for talking to wallet providers.
///
/// Clones share state. Bus listeners hold only a weak reference, so the
/// connector detaches from the bus once the last clone is dropped.
#[derive(Clone)]
pub struct Connector {
    inner: Arc<Inner>,
}

impl Connector {
    /// Creates a connector on `bus` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the discovery HTTP client cannot be built.
    pub fn new(bus: Arc<dyn EventBus>) -> Result<Self> {
        ConnectorBuilder::new().bus(bus).build()
    }

    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> ConnectorBuilder {
        ConnectorBuilder::new()
    }

    pub(crate) fn from_parts(
        bus: Arc<dyn EventBus>,
        bus_id: String,
        request_timeout: Option<Duration>,
        discovery: Option<Arc<StationDiscovery>>,
    ) -> Self {
        let main_channel = ChannelName::new(bus_id.as_str());
        let connector = Self {
            inner: Arc::new(Inner {
                bus,
                bus_id,
                main_channel,
                registry: RwLock::new(ProviderRegistry::new()),
                pending: Mutex::new(PendingRequests::default()),
                request_timeout,
                discovery,
                register_subscription: Mutex::new(None),
                response_subscription: Mutex::new(None),
                discovery_subscription: Mutex::new(None),
            }),
        };

        connector.init_station_listener();
        connector.register();
        connector.attach_response_listener();
        connector
    }

    // ========================================================================
    // Listener Setup
    // ========================================================================

    /// Ensures the main channel exists and listens for provider registrations.
    ///
    /// Safe to call repeatedly; only one register listener is kept.
    pub fn register(&self) {
        let inner = &self.inner;
        inner.bus.ensure_channel(&inner.main_channel);

        let mut subscription = inner.register_subscription.lock();
        if subscription.is_some() {
            return;
        }

        let weak = Arc::downgrade(inner);
        let listener: Listener = Arc::new(move |payload| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_register(payload);
            }
        });
        *subscription = Some(inner.bus.subscribe(&inner.main_channel, REGISTER_EVENT, listener));
    }

    fn attach_response_listener(&self) {
        let inner = &self.inner;
        let weak: Weak<Inner> = Arc::downgrade(inner);
        let listener: Listener = Arc::new(move |payload| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_response(payload);
            }
        });

        let id = inner.bus.subscribe(&inner.main_channel, RESPONSE_EVENT, listener);
        *inner.response_subscription.lock() = Some(id);
    }

    fn init_station_listener(&self) {
        let inner = &self.inner;
        let Some(discovery) = &inner.discovery else {
            return;
        };

        let provider_name = discovery.options().provider_name.clone();
        let weak = Arc::downgrade(inner);
        let id = discovery.on(Arc::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_discovery(&provider_name, event);
            }
        }));
        *inner.discovery_subscription.lock() = Some(id);
    }

    // ========================================================================
    // Requests
    // ========================================================================

    /// Sends `command` to a provider and returns a future for its answer.
    ///
    /// Never blocks; the answer resolves the returned [`PendingResponse`].
    /// The request timeout, if configured, counts from dispatch. Dropping
    /// the response abandons the request.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownCommand`] if `command` is not a supported command
    /// - [`Error::ProviderNotRegistered`] if the provider is unknown
    /// - [`Error::DispatchFailed`] if nothing listens on the provider channel
    /// - [`Error::Json`] if `params` cannot be serialized
    pub fn send_message<P: Serialize>(
        &self,
        provider_name: &str,
        command: &str,
        params: P,
    ) -> Result<PendingResponse> {
        let command: Command = command.parse()?;
        self.send_command(provider_name, command, params)
    }

    /// Typed variant of [`Self::send_message`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::send_message`], minus the command check.
    pub fn send_command<P: Serialize>(
        &self,
        provider_name: &str,
        command: Command,
        params: P,
    ) -> Result<PendingResponse> {
        let (tx, rx) = oneshot::channel();
        let request_id =
            self.inner
                .dispatch(provider_name, command, params, Responder::Channel(tx))?;

        let guard = PendingGuard {
            inner: Arc::downgrade(&self.inner),
            request_id,
        };

        let inner = match self.inner.request_timeout {
            None => async move {
                let _guard = guard;
                rx.await?
            }
            .boxed(),
            Some(limit) => {
                let deadline = Instant::now() + limit;
                async move {
                    match timeout_at(deadline, rx).await {
                        Ok(result) => result?,
                        Err(_) => {
                            guard.cancel();
                            let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                            debug!(%request_id, timeout_ms, "Request timed out");
                            Err(Error::request_timeout(request_id, timeout_ms))
                        }
                    }
                }
                .boxed()
            }
        };

        Ok(PendingResponse::new(request_id, inner))
    }

    /// Sends `command` and invokes `callback` exactly once with the answer.
    ///
    /// The callback runs on whichever task delivers the response. It is
    /// never invoked if no response arrives; no request timeout applies.
    ///
    /// # Errors
    ///
    /// Same as [`Self::send_message`]; on error the callback is dropped uncalled.
    pub fn send_message_with_callback<P, F>(
        &self,
        provider_name: &str,
        command: &str,
        params: P,
        callback: F,
    ) -> Result<RequestId>
    where
        P: Serialize,
        F: FnOnce(Result<Value>) + Send + 'static,
    {
        let command: Command = command.parse()?;
        self.inner.dispatch(
            provider_name,
            command,
            params,
            Responder::Callback(Box::new(callback)),
        )
    }

    /// Processes one response payload, as the main-channel listener does.
    ///
    /// Orphan or malformed responses are logged and otherwise ignored.
    pub fn handle_response(&self, payload: &Value) {
        self.inner.handle_response(payload);
    }

    // ========================================================================
    // Station Discovery
    // ========================================================================

    /// Runs one MassaStation discovery pass.
    ///
    /// Failures are logged, never returned.
    pub async fn start_station_discovery(&self) {
        let Some(discovery) = self.inner.discovery.clone() else {
            warn!("Station discovery is disabled for this connector");
            return;
        };

        match discovery.discover_once().await {
            Some(event) => trace!(?event, "Station discovery pass changed state"),
            None => trace!(discovered = discovery.is_discovered(), "Station discovery pass"),
        }
    }

    /// Polls MassaStation every `period` on a background task.
    ///
    /// Returns `None` when discovery is disabled.
    pub fn spawn_station_discovery(&self, period: Duration) -> Option<JoinHandle<()>> {
        self.inner
            .discovery
            .as_ref()
            .map(|discovery| discovery.spawn_polling(period))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns a snapshot of provider name → channel.
    #[must_use]
    pub fn wallet_providers(&self) -> FxHashMap<String, ChannelName> {
        self.inner.registry.read().channels().clone()
    }

    /// Returns the metadata of a provider, if discovery supplied any.
    #[must_use]
    pub fn provider_info(&self, provider_name: &str) -> Option<PluginInfo> {
        self.inner.registry.read().info(provider_name).cloned()
    }

    /// Returns the number of requests awaiting a response.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.inner.pending.lock().len()
    }

    /// Returns `true` if `request_id` still awaits its response.
    #[inline]
    #[must_use]
    pub fn is_pending(&self, request_id: &RequestId) -> bool {
        self.inner.pending.lock().contains(request_id)
    }

    /// Returns the bus id.
    #[inline]
    #[must_use]
    pub fn bus_id(&self) -> &str {
        &self.inner.bus_id
    }

    /// Returns the main channel providers register and respond on.
    #[inline]
    #[must_use]
    pub fn main_channel(&self) -> &ChannelName {
        &self.inner.main_channel
    }

    /// Returns the bus this connector is attached to.
    #[inline]
    #[must_use]
    pub fn bus(&self) -> &Arc<dyn EventBus> {
        &self.inner.bus
    }

    /// Returns the station discovery, if enabled.
    #[inline]
    #[must_use]
    pub fn discovery(&self) -> Option<&Arc<StationDiscovery>> {
        self.inner.discovery.as_ref()
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("bus_id", &self.inner.bus_id)
            .field("providers", &self.inner.registry.read().len())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
