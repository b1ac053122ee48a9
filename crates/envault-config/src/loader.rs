// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./envault.toml` > `~/.config/envault/envault.toml` > `/etc/envault/envault.toml`
//! with environment variable overrides via `ENVAULT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use tracing::debug;

use crate::model::EnvaultConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/envault/envault.toml";

/// File name looked up in the user config dir and the working directory.
pub const CONFIG_FILE_NAME: &str = "envault.toml";

/// Config files in merge order, lowest precedence first.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("envault").join(CONFIG_FILE_NAME));
    }
    let local = std::env::current_dir()
        .map(|d| d.join(CONFIG_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
    paths.push(local);
    paths
}

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/envault/envault.toml`
/// 3. `~/.config/envault/envault.toml`
/// 4. `./envault.toml`
/// 5. `ENVAULT_*` environment variables
pub fn load_config() -> Result<EnvaultConfig, figment::Error> {
    for path in config_file_candidates().iter().filter(|p| p.is_file()) {
        debug!(path = %path.display(), "reading config file");
    }
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<EnvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EnvaultConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<EnvaultConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(EnvaultConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    config_file_candidates().into_iter().fold(
        Figment::new().merge(Serialized::defaults(EnvaultConfig::default())),
        |figment, path| figment.merge(Toml::file(path)),
    )
    .merge(env_provider())
}

/// Environment provider mapping `ENVAULT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that keys containing
/// underscores survive: `ENVAULT_STORE_DATA_DIR` must become `store.data_dir`,
/// not `store.data.dir`.
fn env_provider() -> Env {
    Env::prefixed("ENVAULT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("store_", "store.", 1)
            .replacen("keyring_", "keyring.", 1)
            .replacen("log_", "log.", 1);
        mapped.into()
    })
}
