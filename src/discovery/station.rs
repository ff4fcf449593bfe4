//! Edge-triggered MassaStation discovery.
//!
//! Each [`StationDiscovery::discover_once`] call probes the station and
//! compares the outcome with the previous one. Only transitions are
//! reported:
//!
//! ```text
//!                match
//! undiscovered ─────────► discovered      emits Discovered(info)
//!      ▲                      │
//!      └──────────────────────┘           emits Disconnected
//!         no match / probe error
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::identifiers::SubscriptionId;

use super::options::DiscoveryOptions;
use super::plugin::PluginInfo;
use super::probe::{HttpProbe, Probe};

// ============================================================================
// Types
// ============================================================================

/// Notification raised on a discovery state change.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryEvent {
    /// The wallet plugin became reachable.
    Discovered(PluginInfo),
    /// The wallet plugin is no longer reachable.
    Disconnected,
}

/// Discovery listener callback type.
pub type DiscoveryListener = Arc<dyn Fn(&DiscoveryEvent) + Send + Sync>;

// ============================================================================
// StationDiscovery
// ============================================================================

/// Polls for the local wallet service and reports presence changes.
///
/// Passes are serialized: concurrent callers of [`Self::discover_once`]
/// (a polling task plus a manual pass, say) run one after the other, so
/// listeners see transitions in the same order as the state flag.
pub struct StationDiscovery {
    probe: Arc<dyn Probe>,
    options: DiscoveryOptions,
    discovered: AtomicBool,
    /// Held across probe, state swap and emit.
    pass: AsyncMutex<()>,
    listeners: RwLock<Vec<(SubscriptionId, DiscoveryListener)>>,
}

impl StationDiscovery {
    /// Creates discovery backed by [`HttpProbe`].
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the HTTP client
    /// cannot be built.
    pub fn new(options: DiscoveryOptions) -> Result<Self> {
        let probe = HttpProbe::new(&options)?;
        Ok(Self::with_probe(options, Arc::new(probe)))
    }

    /// Creates discovery backed by a custom probe.
    #[must_use]
    pub fn with_probe(options: DiscoveryOptions, probe: Arc<dyn Probe>) -> Self {
        Self {
            probe,
            options,
            discovered: AtomicBool::new(false),
            pass: AsyncMutex::new(()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Returns the options in use.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Returns `true` while the station is considered present.
    #[inline]
    #[must_use]
    pub fn is_discovered(&self) -> bool {
        self.discovered.load(Ordering::SeqCst)
    }

    /// Attaches a listener for discovery notifications.
    pub fn on(&self, listener: DiscoveryListener) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.listeners.write().push((id, listener));
        id
    }

    /// Detaches a listener. Returns `false` if the id was unknown.
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(sub, _)| *sub != id);
        listeners.len() != before
    }

    /// Runs one discovery pass.
    ///
    /// Probe errors count as "not found" and are only logged.
    /// Returns the notification emitted by this pass, if any.
    pub async fn discover_once(&self) -> Option<DiscoveryEvent> {
        let _pass = self.pass.lock().await;

        let found = match self.probe.fetch_plugins().await {
            Ok(plugins) => plugins
                .into_iter()
                .find(|p| p.is(&self.options.plugin_name, &self.options.plugin_author)),
            Err(e) => {
                debug!(error = %e, url = %self.options.url, "Station probe failed");
                None
            }
        };

        let now = found.is_some();
        let was = self.discovered.swap(now, Ordering::SeqCst);

        let event = match (was, found) {
            (false, Some(info)) => {
                info!(version = %info.version, "MassaStation wallet discovered");
                DiscoveryEvent::Discovered(info)
            }
            (true, None) => {
                info!("MassaStation wallet disconnected");
                DiscoveryEvent::Disconnected
            }
            _ => return None,
        };

        self.emit(&event);
        Some(event)
    }

    /// Spawns a task running [`Self::discover_once`] every `period`.
    ///
    /// Each tick waits for the previous pass, so probes never overlap.
    /// Abort the returned handle to stop polling.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let discovery = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                discovery.discover_once().await;
            }
        })
    }

    fn emit(&self, event: &DiscoveryEvent) {
        let listeners: Vec<DiscoveryListener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();

        if listeners.is_empty() {
            warn!(?event, "Discovery event with no listeners");
        }
        for listener in listeners {
            listener(event);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::error::Error;

    /// Probe replaying scripted outcomes; empty script means timeout.
    #[derive(Default)]
    pub(crate) struct ScriptedProbe {
        outcomes: Mutex<VecDeque<Result<Vec<PluginInfo>>>>,
    }

    impl ScriptedProbe {
        pub(crate) fn push_ok(&self, plugins: Vec<PluginInfo>) {
            self.outcomes.lock().push_back(Ok(plugins));
        }

        pub(crate) fn push_timeout(&self) {
            self.outcomes
                .lock()
                .push_back(Err(Error::timeout("scripted probe", 2000)));
        }
    }

    #[async_trait]
    impl Probe for ScriptedProbe {
        async fn fetch_plugins(&self) -> Result<Vec<PluginInfo>> {
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(Error::timeout("scripted probe", 2000)))
        }
    }

    pub(crate) fn wallet_plugin() -> PluginInfo {
        PluginInfo::new("Massa Wallet", "Massa Labs").with_version("1.2.0")
    }

    fn recording(discovery: &StationDiscovery) -> Arc<Mutex<Vec<DiscoveryEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        discovery.on(Arc::new(move |event| sink.lock().push(event.clone())));
        events
    }

    fn scripted() -> (Arc<ScriptedProbe>, StationDiscovery) {
        let probe = Arc::new(ScriptedProbe::default());
        let discovery = StationDiscovery::with_probe(DiscoveryOptions::new(), probe.clone());
        (probe, discovery)
    }

    #[tokio::test]
    async fn test_discovered_emitted_once_per_run() {
        let (probe, discovery) = scripted();
        let events = recording(&discovery);

        probe.push_ok(vec![wallet_plugin()]);
        probe.push_ok(vec![wallet_plugin()]);
        probe.push_ok(vec![wallet_plugin()]);

        assert_eq!(
            discovery.discover_once().await,
            Some(DiscoveryEvent::Discovered(wallet_plugin()))
        );
        assert_eq!(discovery.discover_once().await, None);
        assert_eq!(discovery.discover_once().await, None);

        assert!(discovery.is_discovered());
        assert_eq!(events.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_no_match_while_undiscovered_is_silent() {
        let (probe, discovery) = scripted();
        let events = recording(&discovery);

        probe.push_ok(vec![
            PluginInfo::new("Node Manager", "Massa Labs"),
            PluginInfo::new("Massa Wallet", "Somebody Else"),
        ]);

        assert_eq!(discovery.discover_once().await, None);
        assert!(!discovery.is_discovered());
        assert!(events.lock().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_after_discovery_disconnects_once() {
        let (probe, discovery) = scripted();
        let events = recording(&discovery);

        probe.push_ok(vec![wallet_plugin()]);
        probe.push_timeout();
        probe.push_timeout();

        discovery.discover_once().await;
        assert_eq!(
            discovery.discover_once().await,
            Some(DiscoveryEvent::Disconnected)
        );
        assert_eq!(discovery.discover_once().await, None);

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], DiscoveryEvent::Disconnected);
    }

    #[tokio::test]
    async fn test_match_lost_without_error_disconnects() {
        let (probe, discovery) = scripted();

        probe.push_ok(vec![wallet_plugin()]);
        probe.push_ok(vec![PluginInfo::new("Node Manager", "Massa Labs")]);

        discovery.discover_once().await;
        assert_eq!(
            discovery.discover_once().await,
            Some(DiscoveryEvent::Disconnected)
        );
        assert!(!discovery.is_discovered());
    }

    #[tokio::test]
    async fn test_rediscovery_after_disconnect() {
        let (probe, discovery) = scripted();
        let events = recording(&discovery);

        probe.push_ok(vec![wallet_plugin()]);
        probe.push_timeout();
        probe.push_ok(vec![wallet_plugin()]);

        for _ in 0..3 {
            discovery.discover_once().await;
        }

        let events = events.lock();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[2], DiscoveryEvent::Discovered(_)));
    }

    #[tokio::test]
    async fn test_off_detaches_listener() {
        let (probe, discovery) = scripted();
        let events = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&events);
        let id = discovery.on(Arc::new(move |_| *sink.lock() += 1));

        assert!(discovery.off(id));
        assert!(!discovery.off(id));

        probe.push_ok(vec![wallet_plugin()]);
        discovery.discover_once().await;
        assert_eq!(*events.lock(), 0);
    }

    /// Probe that answers slowly and tracks how many fetches overlap.
    #[derive(Default)]
    struct SlowProbe {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Probe for SlowProbe {
        async fn fetch_plugins(&self) -> Result<Vec<PluginInfo>> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(vec![wallet_plugin()])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_passes_are_serialized() {
        let probe = Arc::new(SlowProbe::default());
        let discovery = StationDiscovery::with_probe(DiscoveryOptions::new(), probe.clone());
        let events = recording(&discovery);

        let (first, second) = tokio::join!(discovery.discover_once(), discovery.discover_once());

        assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
        assert_eq!(
            [first, second].into_iter().flatten().count(),
            1,
            "only one pass sees the transition"
        );
        assert_eq!(*events.lock(), vec![DiscoveryEvent::Discovered(wallet_plugin())]);
        assert!(discovery.is_discovered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawn_polling_runs_passes() {
        let probe = Arc::new(ScriptedProbe::default());
        probe.push_ok(vec![wallet_plugin()]);
        let discovery = Arc::new(StationDiscovery::with_probe(
            DiscoveryOptions::new(),
            probe.clone(),
        ));

        let handle = discovery.spawn_polling(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(discovery.is_discovered());

        // Script exhausted: next tick times out and disconnects.
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!discovery.is_discovered());

        handle.abort();
    }
}
