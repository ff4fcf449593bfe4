//! Commands a page may send to a wallet provider.
//!
//! The command name doubles as the bus event name on the provider's
//! channel. Payload shapes per command belong to the providers.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Command
// ============================================================================

/// The fixed set of commands understood by wallet providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// List the provider's accounts.
    #[serde(rename = "LIST_ACCOUNTS")]
    ListAccounts,

    /// Delete an account.
    #[serde(rename = "DELETE_ACCOUNT")]
    DeleteAccount,

    /// Import an account from a key pair.
    #[serde(rename = "IMPORT_ACCOUNT")]
    ImportAccount,

    /// Query an account balance.
    #[serde(rename = "ACCOUNT_BALANCE")]
    AccountBalance,

    /// Sign data with an account.
    #[serde(rename = "ACCOUNT_SIGN")]
    AccountSign,

    /// Get the node URLs the provider is using.
    #[serde(rename = "GET_NODES_URLS")]
    GetNodesUrls,

    /// Get the network the provider is connected to.
    #[serde(rename = "GET_NETWORK")]
    GetNetwork,

    /// Sell rolls.
    #[serde(rename = "ACCOUNT_SELL_ROLLS")]
    AccountSellRolls,

    /// Buy rolls.
    #[serde(rename = "ACCOUNT_BUY_ROLLS")]
    AccountBuyRolls,

    /// Send a transaction.
    #[serde(rename = "ACCOUNT_SEND_TRANSACTION")]
    AccountSendTransaction,

    /// Call a smart contract.
    #[serde(rename = "ACCOUNT_CALL_SC")]
    AccountCallSc,

    /// Generate a fresh account.
    #[serde(rename = "GENERATE_NEW_ACCOUNT")]
    GenerateNewAccount,

    /// Ask the provider to connect this page.
    #[serde(rename = "CONNECT")]
    Connect,

    /// Ask the provider to disconnect this page.
    #[serde(rename = "DISCONNECT")]
    Disconnect,

    /// Ask whether this page is connected.
    #[serde(rename = "CONNECTED")]
    Connected,
}

impl Command {
    /// Every supported command, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::ListAccounts,
        Self::DeleteAccount,
        Self::ImportAccount,
        Self::AccountBalance,
        Self::AccountSign,
        Self::GetNodesUrls,
        Self::GetNetwork,
        Self::AccountSellRolls,
        Self::AccountBuyRolls,
        Self::AccountSendTransaction,
        Self::AccountCallSc,
        Self::GenerateNewAccount,
        Self::Connect,
        Self::Disconnect,
        Self::Connected,
    ];

    /// Returns the wire name, used as the bus event name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ListAccounts => "LIST_ACCOUNTS",
            Self::DeleteAccount => "DELETE_ACCOUNT",
            Self::ImportAccount => "IMPORT_ACCOUNT",
            Self::AccountBalance => "ACCOUNT_BALANCE",
            Self::AccountSign => "ACCOUNT_SIGN",
            Self::GetNodesUrls => "GET_NODES_URLS",
            Self::GetNetwork => "GET_NETWORK",
            Self::AccountSellRolls => "ACCOUNT_SELL_ROLLS",
            Self::AccountBuyRolls => "ACCOUNT_BUY_ROLLS",
            Self::AccountSendTransaction => "ACCOUNT_SEND_TRANSACTION",
            Self::AccountCallSc => "ACCOUNT_CALL_SC",
            Self::GenerateNewAccount => "GENERATE_NEW_ACCOUNT",
            Self::Connect => "CONNECT",
            Self::Disconnect => "DISCONNECT",
            Self::Connected => "CONNECTED",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| Error::unknown_command(s))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn test_parse_every_command() {
        for command in Command::ALL {
            let parsed: Command = command.as_str().parse().expect("known command");
            assert_eq!(parsed, command);
        }
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for command in Command::ALL {
            let json = serde_json::to_string(&command).expect("serialize");
            assert_eq!(json, format!("\"{}\"", command.as_str()));
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        let err = "account_balance".parse::<Command>().unwrap_err();
        assert!(matches!(err, Error::UnknownCommand { ref command } if command == "account_balance"));
    }

    proptest! {
        #[test]
        fn prop_lowercase_strings_are_unknown(s in "[a-z_]{0,24}") {
            prop_assert!(s.parse::<Command>().is_err());
        }
    }
}
