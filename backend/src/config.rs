//! Runtime configuration.
//!
//! [`TransformOptions`] tune a single transform run. [`ServerConfig`] is read
//! from the environment (a `.env` file is loaded by the binary at startup).

use serde::{Deserialize, Serialize};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upload limit (50 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Suggested file name for the processed export.
pub const DEFAULT_DOWNLOAD_NAME: &str = "processed_file.csv";

/// Order of the aggregated output rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupOrder {
    /// Groups appear in the order their first line appears in the input.
    FirstSeen,
    /// Groups are sorted by (Delivery Number, Product ID).
    #[default]
    Sorted,
}

/// Options for a transform run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Output row order
    #[serde(default)]
    pub group_order: GroupOrder,
}

impl TransformOptions {
    pub fn sorted() -> Self {
        Self {
            group_order: GroupOrder::Sorted,
        }
    }

    pub fn first_seen() -> Self {
        Self {
            group_order: GroupOrder::FirstSeen,
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub max_upload_bytes: usize,
    pub download_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Build from `SHIPMERGE_PORT`, `SHIPMERGE_MAX_UPLOAD_BYTES` and
    /// `SHIPMERGE_DOWNLOAD_NAME`. Unset or unparsable values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            port: lookup("SHIPMERGE_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
            max_upload_bytes: lookup("SHIPMERGE_MAX_UPLOAD_BYTES")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            download_name: lookup("SHIPMERGE_DOWNLOAD_NAME")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.download_name),
        }
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_options() {
        let opts = TransformOptions::default();
        assert_eq!(opts.group_order, GroupOrder::Sorted);
        assert_eq!(
            TransformOptions::first_seen().group_order,
            GroupOrder::FirstSeen
        );
    }

    #[test]
    fn test_options_deserialize_with_missing_fields() {
        let opts: TransformOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.group_order, GroupOrder::Sorted);

        let opts: TransformOptions =
            serde_json::from_str(r#"{"groupOrder":"firstSeen"}"#).unwrap();
        assert_eq!(opts.group_order, GroupOrder::FirstSeen);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("SHIPMERGE_PORT", "8080"),
            ("SHIPMERGE_MAX_UPLOAD_BYTES", "not-a-number"),
            ("SHIPMERGE_DOWNLOAD_NAME", "out.csv"),
        ]
        .into_iter()
        .collect();

        let config = ServerConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.download_name, "out.csv");
    }

    #[test]
    fn test_cli_port_overrides_env() {
        let config = ServerConfig::default().with_port(Some(9000));
        assert_eq!(config.port, 9000);
        assert_eq!(ServerConfig::default().with_port(None).port, DEFAULT_PORT);
    }
}
