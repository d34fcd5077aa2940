//! Node configuration with TOML file support.

use ballot_types::PublicKey;
use ballot_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::NodeError;

/// Configuration for a ballot node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for the LMDB store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Hex public key allowed to create elections and polls.
    #[serde(default)]
    pub authority_key: String,

    /// Root of the directory-backed manifest store.
    #[serde(default = "default_manifest_dir")]
    pub manifest_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./ballot_data")
}

fn default_manifest_dir() -> PathBuf {
    PathBuf::from("./manifests")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }

    /// Decode the authority key. It must be set and be a valid Ed25519 key.
    pub fn authority(&self) -> Result<PublicKey, NodeError> {
        if self.authority_key.is_empty() {
            return Err(NodeError::Config("authority_key is not set".into()));
        }
        ballot_crypto::decode_public_key_hex(&self.authority_key)
            .map_err(|e| NodeError::Config(format!("authority_key: {e}")))
    }

    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            authority_key: String::new(),
            manifest_dir: default_manifest_dir(),
            map_size_mb: default_map_size_mb(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig {
            authority_key: KEY.into(),
            ..NodeConfig::default()
        };
        let parsed = NodeConfig::from_toml_str(&config.to_toml_string()).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.map_size_mb, 1024);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.data_dir, PathBuf::from("./ballot_data"));
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"
            manifest_dir = "/srv/polls"
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.manifest_dir, PathBuf::from("/srv/polls"));
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_log_format_is_config_error() {
        let err = NodeConfig::from_toml_str(r#"log_format = "xml""#).unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/ballot.toml");
        assert!(matches!(result.unwrap_err(), NodeError::Config(_)));
    }

    #[test]
    fn authority_must_be_set_and_valid() {
        let mut config = NodeConfig::default();
        assert!(matches!(config.authority(), Err(NodeError::Config(_))));

        config.authority_key = "abcd".into();
        assert!(matches!(config.authority(), Err(NodeError::Config(_))));

        config.authority_key = KEY.to_uppercase();
        assert_eq!(config.authority().unwrap().to_hex(), KEY);
    }
}
