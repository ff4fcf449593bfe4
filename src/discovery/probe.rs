//! Network probe used by discovery.
//!
//! [`Probe`] is the seam between the discovery state machine and the
//! network. [`HttpProbe`] is the production implementation.

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;
use url::Url;

use crate::error::{Error, Result};

use super::options::DiscoveryOptions;
use super::plugin::PluginInfo;

// ============================================================================
// Probe
// ============================================================================

/// Fetches the plugin list from the local wallet service.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Performs one bounded-time fetch.
    ///
    /// # Errors
    ///
    /// Any error means the service is treated as unreachable.
    async fn fetch_plugins(&self) -> Result<Vec<PluginInfo>>;
}

// ============================================================================
// HttpProbe
// ============================================================================

/// `GET`s the plugin-manager endpoint and decodes a JSON array.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    url: Url,
    timeout_ms: u64,
}

impl HttpProbe {
    /// Creates a probe from discovery options.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`] if the options are invalid
    /// - [`Error::Http`] if the HTTP client cannot be built
    pub fn new(options: &DiscoveryOptions) -> Result<Self> {
        options.validate()?;
        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client,
            url: options.parsed_url()?,
            timeout_ms: options.timeout_ms(),
        })
    }

    /// Returns the probed URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn fetch_plugins(&self) -> Result<Vec<PluginInfo>> {
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                Error::timeout(format!("GET {}", self.url), self.timeout_ms)
            } else {
                Error::Http(e)
            }
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(map_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::unexpected_status(status.as_u16(), self.url.as_str()));
        }

        let plugins: Vec<PluginInfo> = response.json().await.map_err(map_err)?;
        trace!(url = %self.url, count = plugins.len(), "Plugin list fetched");
        Ok(plugins)
    }
}

// ============================================================================
// Tests
// ============================================================================
