//! Known providers and their metadata.

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;

use crate::discovery::PluginInfo;
use crate::identifiers::ChannelName;

// ============================================================================
// ProviderRegistry
// ============================================================================

/// Provider name → channel, plus discovery-supplied metadata.
///
/// Registration overwrites any previous entry for the same name.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    channels: FxHashMap<String, ChannelName>,
    infos: FxHashMap<String, PluginInfo>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `channel` for `provider_name`, returning the replaced channel.
    pub fn register(
        &mut self,
        provider_name: impl Into<String>,
        channel: ChannelName,
    ) -> Option<ChannelName> {
        self.channels.insert(provider_name.into(), channel)
    }

    /// Stores a discovered provider together with its metadata.
    pub fn register_discovered(
        &mut self,
        provider_name: &str,
        channel: ChannelName,
        info: PluginInfo,
    ) {
        self.channels.insert(provider_name.to_string(), channel);
        self.infos.insert(provider_name.to_string(), info);
    }

    /// Removes a provider from both maps. Returns `true` if anything was removed.
    pub fn remove(&mut self, provider_name: &str) -> bool {
        let channel = self.channels.remove(provider_name).is_some();
        let info = self.infos.remove(provider_name).is_some();
        channel || info
    }

    /// Returns the channel a provider listens on.
    #[inline]
    #[must_use]
    pub fn channel(&self, provider_name: &str) -> Option<&ChannelName> {
        self.channels.get(provider_name)
    }

    /// Returns the metadata of a provider.
    #[inline]
    #[must_use]
    pub fn info(&self, provider_name: &str) -> Option<&PluginInfo> {
        self.infos.get(provider_name)
    }

    /// Returns all provider channels.
    #[inline]
    #[must_use]
    pub fn channels(&self) -> &FxHashMap<String, ChannelName> {
        &self.channels
    }

    /// Returns the number of known providers.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no provider is known.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
