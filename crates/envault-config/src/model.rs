// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Envault secret store.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level Envault configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EnvaultConfig {
    /// Store file location and database settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// OS credential vault settings for the master key.
    #[serde(default)]
    pub keyring: KeyringConfig,

    /// Logging settings.
    #[serde(default)]
    pub log: LogConfig,
}

/// Store file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory holding the store file. Created with mode 0700 on first use.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the store database inside `data_dir`.
    #[serde(default = "default_database_file")]
    pub database_file: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl StoreConfig {
    /// Full path of the store database.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.database_file)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            database_file: default_database_file(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_data_dir() -> String {
    dirs::config_dir()
        .map(|p| p.join("envault"))
        .unwrap_or_else(|| PathBuf::from(".envault"))
        .to_string_lossy()
        .into_owned()
}

fn default_database_file() -> String {
    "envault.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// OS credential vault configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct KeyringConfig {
    /// Service name the master key is filed under.
    #[serde(default = "default_service")]
    pub service: String,

    /// Account name override. `None` uses the current login name.
    #[serde(default)]
    pub user: Option<String>,
}

impl Default for KeyringConfig {
    fn default() -> Self {
        Self {
            service: default_service(),
            user: None,
        }
    }
}

fn default_service() -> String {
    "envault-secret-key".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_joins_dir_and_file() {
        let store = StoreConfig {
            data_dir: "/var/lib/envault".into(),
            database_file: "secrets.db".into(),
            wal_mode: true,
        };
        assert_eq!(
            store.database_path(),
            PathBuf::from("/var/lib/envault/secrets.db")
        );
    }

    #[test]
    fn defaults_point_into_config_dir() {
        let config = EnvaultConfig::default();
        assert!(config.store.data_dir.ends_with("envault"));
        assert_eq!(config.store.database_file, "envault.db");
        assert_eq!(config.keyring.service, "envault-secret-key");
        assert!(config.keyring.user.is_none());
        assert_eq!(config.log.level, "warn");
    }
}
