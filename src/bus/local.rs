//! In-process bus implementation.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::identifiers::{ChannelName, SubscriptionId};

use super::{EventBus, Listener};

// ============================================================================
// Types
// ============================================================================

/// Listeners of one channel, keyed by event name, in subscription order.
type ChannelListeners = FxHashMap<String, Vec<(SubscriptionId, Listener)>>;

// ============================================================================
// LocalBus
// ============================================================================

/// Bus backed by an in-memory listener registry.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct LocalBus {
    channels: Arc<RwLock<FxHashMap<ChannelName, ChannelListeners>>>,
}

impl LocalBus {
    /// Creates an empty bus.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of existing channels.
    #[inline]
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.read().len()
    }

    /// Returns the number of listeners attached to `event` on `channel`.
    #[must_use]
    pub fn listener_count(&self, channel: &ChannelName, event: &str) -> usize {
        self.channels
            .read()
            .get(channel)
            .and_then(|events| events.get(event))
            .map_or(0, Vec::len)
    }
}

impl EventBus for LocalBus {
    fn ensure_channel(&self, channel: &ChannelName) {
        self.channels.write().entry(channel.clone()).or_default();
    }

    fn has_channel(&self, channel: &ChannelName) -> bool {
        self.channels.read().contains_key(channel)
    }

    fn subscribe(&self, channel: &ChannelName, event: &str, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.channels
            .write()
            .entry(channel.clone())
            .or_default()
            .entry(event.to_string())
            .or_default()
            .push((id, listener));

        trace!(%channel, event, %id, "Listener subscribed");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut channels = self.channels.write();
        for events in channels.values_mut() {
            for listeners in events.values_mut() {
                if let Some(pos) = listeners.iter().position(|(sub, _)| *sub == id) {
                    listeners.remove(pos);
                    trace!(%id, "Listener unsubscribed");
                    return true;
                }
            }
        }
        false
    }

    fn publish(&self, channel: &ChannelName, event: &str, payload: &Value) -> usize {
        // Snapshot so listeners can re-enter the bus.
        let listeners: Vec<Listener> = self
            .channels
            .read()
            .get(channel)
            .and_then(|events| events.get(event))
            .map(|subs| subs.iter().map(|(_, l)| Arc::clone(l)).collect())
            .unwrap_or_default();

        for listener in &listeners {
            listener(payload);
        }

        trace!(%channel, event, delivered = listeners.len(), "Event published");
        listeners.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    fn counter_listener(counter: &Arc<AtomicUsize>) -> Listener {
        let counter = Arc::clone(counter);
        Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_ensure_channel_idempotent() {
        let bus = LocalBus::new();
        let channel = ChannelName::new("main");

        bus.ensure_channel(&channel);
        bus.ensure_channel(&channel);

        assert!(bus.has_channel(&channel));
        assert_eq!(bus.channel_count(), 1);
    }

    #[test]
    fn test_publish_without_channel_delivers_nothing() {
        let bus = LocalBus::new();
        let delivered = bus.publish(&ChannelName::new("nowhere"), "register", &json!({}));
        assert_eq!(delivered, 0);
    }

    #[test]
    fn test_publish_routes_by_channel_and_event() {
        let bus = LocalBus::new();
        let a = ChannelName::new("a");
        let b = ChannelName::new("b");
        let hits = Arc::new(AtomicUsize::new(0));

        bus.subscribe(&a, "ping", counter_listener(&hits));

        assert_eq!(bus.publish(&a, "ping", &json!(1)), 1);
        assert_eq!(bus.publish(&a, "pong", &json!(1)), 0);
        assert_eq!(bus.publish(&b, "ping", &json!(1)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = LocalBus::new();
        let channel = ChannelName::new("main");
        let hits = Arc::new(AtomicUsize::new(0));

        let id = bus.subscribe(&channel, "message", counter_listener(&hits));
        assert_eq!(bus.listener_count(&channel, "message"), 1);

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.publish(&channel, "message", &json!(null)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        // Channel outlives its listeners.
        assert!(bus.has_channel(&channel));
    }

    #[test]
    fn test_listener_can_publish_reentrantly() {
        let bus = LocalBus::new();
        let request = ChannelName::new("request");
        let reply = ChannelName::new("reply");
        let hits = Arc::new(AtomicUsize::new(0));

        bus.subscribe(&reply, "message", counter_listener(&hits));

        let inner = bus.clone();
        let reply_channel = reply.clone();
        bus.subscribe(
            &request,
            "ECHO",
            Arc::new(move |payload| {
                inner.publish(&reply_channel, "message", payload);
            }),
        );

        assert_eq!(bus.publish(&request, "ECHO", &json!({"x": 1})), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
