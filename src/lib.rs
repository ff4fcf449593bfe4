//! Massa wallet connector - wallet provider discovery and messaging.
//!
//! This library lets page-side code find wallet providers and exchange
//! requests with them without depending on any provider implementation.
//!
//! # Architecture
//!
//! Two cooperating components share one publish/subscribe bus:
//!
//! - **Connector**: provider registry, pending-request table, and the
//!   dispatch/receive cycle over the bus
//! - **StationDiscovery**: polls the local MassaStation service and
//!   reports presence changes to the connector
//!
//! ```text
//! ┌──────────────────┐   <COMMAND> on <bus>_<name>   ┌──────────────┐
//! │    Connector     │──────────────────────────────►│   Provider   │
//! │                  │◄──────────────────────────────│  (extension) │
//! └────────▲─────────┘   register / message on <bus> └──────────────┘
//!          │ Discovered / Disconnected
//! ┌────────┴─────────┐   GET /plugin-manager         ┌──────────────┐
//! │ StationDiscovery │──────────────────────────────►│ MassaStation │
//! └──────────────────┘                               └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use massa_wallet_connector::{Command, Connector, LocalBus, Result};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let connector = Connector::new(Arc::new(LocalBus::new()))?;
//!     connector.start_station_discovery().await;
//!
//!     let balance = connector
//!         .send_command("BEARBY", Command::AccountBalance, json!({ "address": "AU12..." }))?
//!         .await?;
//!     println!("{balance}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bus`] | Publish/subscribe interface and [`LocalBus`] |
//! | [`connector`] | [`Connector`] and its builder |
//! | [`discovery`] | MassaStation discovery |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Commands and bus payloads |

// ============================================================================
// Modules
// ============================================================================

/// Publish/subscribe bus.
pub mod bus;

/// Provider registry and request/response correlation.
///
/// Use [`Connector::builder()`] to create a configured instance.
pub mod connector;

/// MassaStation discovery.
pub mod discovery;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Bus protocol types.
pub mod protocol;

// ============================================================================
// Re-exports
// ============================================================================

// Bus types
pub use bus::{EventBus, Listener, LocalBus};

// Connector types
pub use connector::{
    Connector, ConnectorBuilder, MASSA_WINDOW_OBJECT, PendingResponse, ProviderRegistry,
    ResponseCallback,
};

// Discovery types
pub use discovery::{
    DiscoveryEvent, DiscoveryOptions, HttpProbe, MASSA_STATION_PROVIDER_NAME, PluginInfo, Probe,
    StationDiscovery,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{ChannelName, RequestId, SubscriptionId};

// Protocol types
pub use protocol::{Command, RegisterMessage, RemoteError, RequestMessage, ResponseMessage};
