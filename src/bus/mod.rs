//! Publish/subscribe bus shared by the connector and wallet providers.
//!
//! A bus is a set of named channels. Each channel carries named events
//! whose payloads are JSON values. The connector owns the main channel
//! (named after the bus id) and publishes requests on each provider's
//! own channel.
//!
//! # Channels
//!
//! ```text
//! massaWalletProvider            "register" ◄── providers announce themselves
//!                                "message"  ◄── providers post responses
//! massaWalletProvider_<name>     "<COMMAND>" ──► requests to one provider
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `local` | In-process [`LocalBus`] implementation |

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::identifiers::{ChannelName, SubscriptionId};

// ============================================================================
// Submodules
// ============================================================================

/// In-process listener registry.
pub mod local;

// ============================================================================
// Re-exports
// ============================================================================

pub use local::LocalBus;

// ============================================================================
// Types
// ============================================================================

/// Listener callback type.
///
/// Invoked synchronously for each matching publish.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

// ============================================================================
// EventBus
// ============================================================================

/// Topic-keyed publish/subscribe interface.
///
/// Implementations must not hold internal locks while running listeners:
/// a listener may publish or subscribe on the same bus.
pub trait EventBus: Send + Sync {
    /// Creates `channel` if it does not exist yet.
    fn ensure_channel(&self, channel: &ChannelName);

    /// Returns `true` if `channel` exists.
    fn has_channel(&self, channel: &ChannelName) -> bool;

    /// Attaches `listener` to `event` on `channel`, creating the channel if needed.
    fn subscribe(&self, channel: &ChannelName, event: &str, listener: Listener) -> SubscriptionId;

    /// Detaches a listener. Returns `false` if the id was unknown.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Delivers `payload` to every listener of `event` on `channel`.
    ///
    /// Returns the number of listeners that ran.
    fn publish(&self, channel: &ChannelName, event: &str, payload: &Value) -> usize;
}
