//! Builder pattern for connector configuration.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use massa_wallet_connector::{Connector, LocalBus};
//!
//! # fn example() -> massa_wallet_connector::Result<()> {
//! let connector = Connector::builder()
//!     .bus(Arc::new(LocalBus::new()))
//!     .request_timeout(Duration::from_secs(60))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::bus::{EventBus, LocalBus};
use crate::discovery::{DiscoveryOptions, Probe, StationDiscovery};
use crate::error::{Error, Result};

use super::core::Connector;
use super::MASSA_WINDOW_OBJECT;

// ============================================================================
// ConnectorBuilder
// ============================================================================

/// Builder for configuring a [`Connector`] instance.
///
/// Use [`Connector::builder()`] to create a new builder.
pub struct ConnectorBuilder {
    /// Shared bus; a fresh [`LocalBus`] if unset.
    bus: Option<Arc<dyn EventBus>>,
    /// Main channel name and provider channel prefix.
    bus_id: String,
    /// Optional deadline for future-style requests.
    request_timeout: Option<Duration>,
    /// Discovery configuration.
    discovery_options: DiscoveryOptions,
    /// Probe override, mainly for tests.
    probe: Option<Arc<dyn Probe>>,
    /// Whether to create station discovery at all.
    discovery_enabled: bool,
}

impl Default for ConnectorBuilder {
    fn default() -> Self {
        Self {
            bus: None,
            bus_id: MASSA_WINDOW_OBJECT.to_string(),
            request_timeout: None,
            discovery_options: DiscoveryOptions::new(),
            probe: None,
            discovery_enabled: true,
        }
    }
}

// ============================================================================
// ConnectorBuilder Implementation
// ============================================================================

impl ConnectorBuilder {
    /// Creates a builder with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bus shared with providers.
    #[inline]
    #[must_use]
    pub fn bus(mut self, bus: Arc<dyn EventBus>) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Sets the bus id (default `massaWalletProvider`).
    #[inline]
    #[must_use]
    pub fn bus_id(mut self, bus_id: impl Into<String>) -> Self {
        self.bus_id = bus_id.into();
        self
    }

    /// Fails future-style requests that get no response within `timeout`.
    ///
    /// Requests never time out unless this is set.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Sets the station discovery options.
    #[inline]
    #[must_use]
    pub fn discovery_options(mut self, options: DiscoveryOptions) -> Self {
        self.discovery_options = options;
        self.discovery_enabled = true;
        self
    }

    /// Replaces the HTTP probe used by station discovery.
    #[inline]
    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = Some(probe);
        self.discovery_enabled = true;
        self
    }

    /// Builds a connector without station discovery.
    #[inline]
    #[must_use]
    pub fn without_discovery(mut self) -> Self {
        self.discovery_enabled = false;
        self
    }

    /// Builds the connector with validation.
    ///
    /// Registers the connector's listeners on the bus before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the bus id is empty or the timeout is zero
    /// - [`Error::Config`] if the discovery options are invalid
    /// - [`Error::Http`] if the discovery HTTP client cannot be built
    pub fn build(self) -> Result<Connector> {
        if self.bus_id.is_empty() {
            return Err(Error::config("Bus id must not be empty"));
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("Request timeout must be greater than zero"));
        }

        let discovery = if self.discovery_enabled {
            self.discovery_options.validate()?;
            let discovery = match self.probe {
                Some(probe) => StationDiscovery::with_probe(self.discovery_options, probe),
                None => StationDiscovery::new(self.discovery_options)?,
            };
            Some(Arc::new(discovery))
        } else {
            None
        };

        let bus = self.bus.unwrap_or_else(|| Arc::new(LocalBus::new()));

        Ok(Connector::from_parts(
            bus,
            self.bus_id,
            self.request_timeout,
            discovery,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let connector = ConnectorBuilder::new().build().expect("build");
        assert_eq!(connector.bus_id(), MASSA_WINDOW_OBJECT);
        assert!(connector.discovery().is_some());
    }

    #[test]
    fn test_without_discovery() {
        let connector = ConnectorBuilder::new()
            .without_discovery()
            .build()
            .expect("build");
        assert!(connector.discovery().is_none());
    }

    #[test]
    fn test_empty_bus_id_rejected() {
        let result = ConnectorBuilder::new().bus_id("").build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = ConnectorBuilder::new()
            .request_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_invalid_discovery_options_rejected() {
        let result = ConnectorBuilder::new()
            .discovery_options(DiscoveryOptions::new().with_url("::nope::"))
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_custom_bus_id() {
        let connector = ConnectorBuilder::new()
            .bus_id("testBus")
            .without_discovery()
            .build()
            .expect("build");
        assert_eq!(connector.main_channel().as_str(), "testBus");
    }
}
