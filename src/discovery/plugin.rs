//! Plugin records returned by the MassaStation plugin manager.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// PluginInfo
// ============================================================================

/// Metadata describing one installed MassaStation plugin.
///
/// Unknown fields are kept in [`PluginInfo::extra`] so the record can be
/// handed back to callers unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name.
    #[serde(default)]
    pub name: String,

    /// Plugin author.
    #[serde(default)]
    pub author: String,

    /// Capability description.
    #[serde(default)]
    pub description: String,

    /// Plugin version.
    #[serde(default)]
    pub version: String,

    /// Plugin home page, relative to the station.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    /// Runtime status reported by the station.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Logo path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Fields not modeled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PluginInfo {
    /// Creates a record with the given identity.
    #[must_use]
    pub fn new(name: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Sets the version.
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Returns `true` if both name and author match exactly.
    #[inline]
    #[must_use]
    pub fn is(&self, name: &str, author: &str) -> bool {
        self.name == name && self.author == author
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_parse_station_record() {
        let value = json!({
            "name": "Massa Wallet",
            "author": "Massa Labs",
            "description": "Official wallet",
            "version": "0.3.1",
            "home": "/plugin/massa-labs/massa-wallet/",
            "status": "Up",
            "id": "1234",
            "updatable": false
        });

        let info: PluginInfo = serde_json::from_value(value).expect("parse");
        assert!(info.is("Massa Wallet", "Massa Labs"));
        assert_eq!(info.version, "0.3.1");
        assert_eq!(info.status.as_deref(), Some("Up"));
        assert_eq!(info.extra.get("id"), Some(&json!("1234")));
        assert_eq!(info.extra.get("updatable"), Some(&json!(false)));
    }

    #[test]
    fn test_missing_fields_default() {
        let info: PluginInfo = serde_json::from_value(json!({"name": "Node Manager"})).expect("parse");
        assert_eq!(info.author, "");
        assert!(!info.is("Node Manager", "Massa Labs"));
    }

    #[test]
    fn test_match_is_exact() {
        let info = PluginInfo::new("Massa Wallet", "Massa Labs");
        assert!(!info.is("massa wallet", "Massa Labs"));
        assert!(!info.is("Massa Wallet", "Massa Labs "));
    }
}
