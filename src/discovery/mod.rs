//! Discovery of the locally running MassaStation wallet.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`StationDiscovery`] | Edge-triggered presence state machine |
//! | [`DiscoveryEvent`] | `Discovered` / `Disconnected` notifications |
//! | [`Probe`] | Network seam, implemented by [`HttpProbe`] |
//! | [`DiscoveryOptions`] | Endpoint, timeout and plugin identity |
//! | [`PluginInfo`] | Plugin record returned by the station |

// ============================================================================
// Submodules
// ============================================================================

/// Discovery configuration.
pub mod options;

/// Plugin metadata records.
pub mod plugin;

/// HTTP probe.
pub mod probe;

/// Discovery state machine.
pub mod station;

// ============================================================================
// Re-exports
// ============================================================================

pub use options::{
    DEFAULT_PROBE_TIMEOUT, DiscoveryOptions, MASSA_STATION_DISCOVERY_URL,
    MASSA_STATION_PROVIDER_NAME, MS_WALLET_PLUGIN_AUTHOR, MS_WALLET_PLUGIN_NAME,
};
pub use plugin::PluginInfo;
pub use probe::{HttpProbe, Probe};
pub use station::{DiscoveryEvent, DiscoveryListener, StationDiscovery};
