//! Bus protocol types.
//!
//! | Message | Channel | Event | Direction |
//! |---------|---------|-------|-----------|
//! | [`RegisterMessage`] | main | `register` | Provider → Connector |
//! | [`RequestMessage`] | `<bus-id>_<provider>` | `<COMMAND>` | Connector → Provider |
//! | [`ResponseMessage`] | main | `message` | Provider → Connector |
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | The fixed [`Command`] set |
//! | `message` | Request, response and registration payloads |

// ============================================================================
// Constants
// ============================================================================

/// Event name providers use to announce themselves.
pub const REGISTER_EVENT: &str = "register";

/// Event name providers use to post responses.
pub const RESPONSE_EVENT: &str = "message";

// ============================================================================
// Submodules
// ============================================================================

/// Supported wallet commands.
pub mod command;

/// Bus payload types.
pub mod message;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::Command;
pub use message::{RegisterMessage, RemoteError, RequestMessage, ResponseMessage};
