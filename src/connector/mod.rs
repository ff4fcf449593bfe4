//! Wallet connector module.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Connector`] | Provider registry and request/response correlation |
//! | [`ConnectorBuilder`] | Fluent configuration builder |
//! | [`PendingResponse`] | Future resolving to one provider answer |
//! | [`ProviderRegistry`] | Provider name → channel and metadata |
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use massa_wallet_connector::{Connector, LocalBus, Result};
//! use serde_json::json;
//!
//! # async fn example() -> Result<()> {
//! let connector = Connector::new(Arc::new(LocalBus::new()))?;
//! connector.start_station_discovery().await;
//!
//! for name in connector.wallet_providers().keys() {
//!     let accounts = connector.send_message(name, "LIST_ACCOUNTS", json!({}))?.await?;
//!     println!("{name}: {accounts}");
//! }
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Constants
// ============================================================================

/// Default bus id: the main channel name and provider channel prefix.
pub const MASSA_WINDOW_OBJECT: &str = "massaWalletProvider";

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder for connector configuration.
pub mod builder;

/// Core connector implementation.
pub mod core;

/// Pending request table and response future.
pub mod pending;

/// Provider registry.
pub mod registry;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ConnectorBuilder;
pub use self::core::Connector;
pub use pending::{PendingResponse, ResponseCallback};
pub use registry::ProviderRegistry;
