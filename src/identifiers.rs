//! Type-safe identifiers for bus and connector entities.
//!
//! Newtype wrappers prevent mixing request ids, channel names and
//! subscription handles at compile time.
//!
//! | Type | Wraps | Source |
//! |------|-------|--------|
//! | [`RequestId`] | UUID v4 | Generated per outbound request |
//! | [`ChannelName`] | `String` | Bus id or `<bus-id>_<provider>` |
//! | [`SubscriptionId`] | `u64` | Process-wide counter |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// RequestId
// ============================================================================

/// Correlation id for a single outbound request.
///
/// Serialized as a hyphenated UUID string in `requestId` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh random id.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

// ============================================================================
// ChannelName
// ============================================================================

/// Name of a bus channel.
///
/// The connector's main channel is named after the bus id; each provider
/// listens on `<bus-id>_<providerName>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    /// Creates a channel name from any string.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the channel a provider listens on.
    #[inline]
    #[must_use]
    pub fn for_provider(bus_id: &str, provider_name: &str) -> Self {
        Self(format!("{bus_id}_{provider_name}"))
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ChannelName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

// ============================================================================
// SubscriptionId
// ============================================================================

static NEXT_SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned by `subscribe`/`on`, used to detach a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Allocates the next process-wide subscription id.
    #[inline]
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SUBSCRIPTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw counter value.
    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use rustc_hash::FxHashSet;

    #[test]
    fn test_request_id_unique() {
        let ids: FxHashSet<RequestId> = (0..1000).map(|_| RequestId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_request_id_serializes_as_string() {
        let id = RequestId::generate();
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{id}\""));

        let back: RequestId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_request_id_is_v4() {
        let id = RequestId::generate();
        assert_eq!(id.as_uuid().get_version_num(), 4);
        assert_eq!(RequestId::from(*id.as_uuid()), id);
    }

    #[test]
    fn test_channel_for_provider() {
        let channel = ChannelName::for_provider("massaWalletProvider", "BEARBY");
        assert_eq!(channel.as_str(), "massaWalletProvider_BEARBY");
    }

    #[test]
    fn test_subscription_ids_increase() {
        let a = SubscriptionId::next();
        let b = SubscriptionId::next();
        assert!(b > a);
        assert!(b.as_u64() > a.as_u64());
        assert_eq!(a.to_string(), format!("sub-{}", a.as_u64()));
    }
}
