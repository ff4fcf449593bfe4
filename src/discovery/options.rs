//! MassaStation discovery configuration.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use massa_wallet_connector::DiscoveryOptions;
//!
//! let options = DiscoveryOptions::new()
//!     .with_url("http://127.0.0.1:8080/plugin-manager")
//!     .with_timeout(Duration::from_millis(500));
//! options.validate()?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Plugin-manager endpoint served by MassaStation.
pub const MASSA_STATION_DISCOVERY_URL: &str = "https://station.massa/plugin-manager";

/// Default probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Name of the wallet plugin inside MassaStation.
pub const MS_WALLET_PLUGIN_NAME: &str = "Massa Wallet";

/// Author of the wallet plugin inside MassaStation.
pub const MS_WALLET_PLUGIN_AUTHOR: &str = "Massa Labs";

/// Provider name MassaStation is registered under.
pub const MASSA_STATION_PROVIDER_NAME: &str = "MASSASTATION";

// ============================================================================
// DiscoveryOptions
// ============================================================================

/// Where and how to look for the local wallet service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Endpoint returning the plugin list.
    pub url: String,

    /// Upper bound for a single probe.
    pub timeout: Duration,

    /// Expected plugin `name`.
    pub plugin_name: String,

    /// Expected plugin `author`.
    pub plugin_author: String,

    /// Provider name used in the connector's registries.
    pub provider_name: String,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl DiscoveryOptions {
    /// Creates options targeting the standard MassaStation endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: MASSA_STATION_DISCOVERY_URL.to_string(),
            timeout: DEFAULT_PROBE_TIMEOUT,
            plugin_name: MS_WALLET_PLUGIN_NAME.to_string(),
            plugin_author: MS_WALLET_PLUGIN_AUTHOR.to_string(),
            provider_name: MASSA_STATION_PROVIDER_NAME.to_string(),
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl DiscoveryOptions {
    /// Sets the discovery endpoint.
    #[inline]
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the probe timeout.
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the plugin identity to match.
    #[inline]
    #[must_use]
    pub fn with_plugin(mut self, name: impl Into<String>, author: impl Into<String>) -> Self {
        self.plugin_name = name.into();
        self.plugin_author = author.into();
        self
    }

    /// Sets the provider name used for the discovered service.
    #[inline]
    #[must_use]
    pub fn with_provider_name(mut self, name: impl Into<String>) -> Self {
        self.provider_name = name.into();
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl DiscoveryOptions {
    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for an unparseable URL, a zero timeout or
    /// an empty identity.
    pub fn validate(&self) -> Result<()> {
        self.parsed_url()?;
        if self.timeout.is_zero() {
            return Err(Error::config("Discovery timeout must be greater than zero"));
        }
        if self.plugin_name.is_empty() || self.plugin_author.is_empty() {
            return Err(Error::config("Plugin name and author must not be empty"));
        }
        if self.provider_name.is_empty() {
            return Err(Error::config("Provider name must not be empty"));
        }
        Ok(())
    }

    /// Parses the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the URL does not parse.
    pub fn parsed_url(&self) -> Result<Url> {
        Url::parse(&self.url)
            .map_err(|e| Error::config(format!("Invalid discovery URL {}: {e}", self.url)))
    }

    /// Returns the timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }
}

// ============================================================================
// Tests
// ============================================================================
