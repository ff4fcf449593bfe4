//! Error types for the wallet connector.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use massa_wallet_connector::{Connector, Result};
//!
//! async fn balance(connector: &Connector) -> Result<serde_json::Value> {
//!     let pending = connector.send_message("BEARBY", "ACCOUNT_BALANCE", json!({}))?;
//!     pending.await
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Usage | [`Error::UnknownCommand`], [`Error::ProviderNotRegistered`], [`Error::DispatchFailed`], [`Error::Config`] |
//! | Remote | [`Error::Remote`], [`Error::RequestTimeout`] |
//! | Discovery | [`Error::Timeout`], [`Error::Http`], [`Error::UnexpectedStatus`] |
//! | External | [`Error::Json`], [`Error::ChannelClosed`] |
//!
//! Usage errors are returned synchronously at the call site. Remote errors
//! arrive later through the request's responder.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;

use crate::identifiers::{ChannelName, RequestId};

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Usage Errors
    // ========================================================================
    /// Command is not part of the supported command set.
    #[error("Unknown command {command}")]
    UnknownCommand {
        /// The unrecognized command name.
        command: String,
    },

    /// No provider with this name has registered, or its channel is gone.
    #[error("Registered provider with name {provider} does not exist")]
    ProviderNotRegistered {
        /// Provider name used by the caller.
        provider: String,
    },

    /// The provider channel exists but no listener consumed the request.
    #[error("Could not dispatch a message to {channel}")]
    DispatchFailed {
        /// Channel the request was published on.
        channel: ChannelName,
    },

    /// Configuration error.
    ///
    /// Returned when builder or options validation fails.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// The provider answered the request with an error.
    #[error("{message}")]
    Remote {
        /// Message reported by the provider.
        message: String,
    },

    /// No response arrived within the configured request timeout.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Discovery Errors
    // ========================================================================
    /// Operation timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// Discovery endpoint answered with a non-success status.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// HTTP client error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The connector was dropped before the request resolved.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an unknown command error.
    #[inline]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::UnknownCommand {
            command: command.into(),
        }
    }

    /// Creates a provider not registered error.
    #[inline]
    pub fn provider_not_registered(provider: impl Into<String>) -> Self {
        Self::ProviderNotRegistered {
            provider: provider.into(),
        }
    }

    /// Creates a dispatch failed error.
    #[inline]
    pub fn dispatch_failed(channel: ChannelName) -> Self {
        Self::DispatchFailed { channel }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a remote error from a provider-supplied message.
    #[inline]
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates an unexpected status error.
    #[inline]
    pub fn unexpected_status(status: u16, url: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            url: url.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` for call-site misuse that fails before anything is dispatched.
    #[inline]
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. }
                | Self::ProviderNotRegistered { .. }
                | Self::DispatchFailed { .. }
                | Self::Config { .. }
        )
    }

    /// Returns `true` if the provider itself reported this error.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::RequestTimeout { .. } => true,
            Self::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unknown_command("FLY_TO_MOON");
        assert_eq!(err.to_string(), "Unknown command FLY_TO_MOON");

        let err = Error::provider_not_registered("GHOST");
        assert_eq!(
            err.to_string(),
            "Registered provider with name GHOST does not exist"
        );
    }

    #[test]
    fn test_remote_display_is_message() {
        let err = Error::remote("user rejected");
        assert_eq!(err.to_string(), "user rejected");
        assert!(err.is_remote());
        assert!(!err.is_usage_error());
    }

    #[test]
    fn test_is_usage_error() {
        let channel = ChannelName::new("massaWalletProvider_X");
        assert!(Error::dispatch_failed(channel).is_usage_error());
        assert!(Error::config("bad").is_usage_error());
        assert!(!Error::timeout("probe", 2000).is_usage_error());
    }

    #[test]
    fn test_is_timeout() {
        let id = RequestId::generate();
        assert!(Error::request_timeout(id, 100).is_timeout());
        assert!(Error::timeout("probe", 2000).is_timeout());
        assert!(!Error::remote("nope").is_timeout());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
