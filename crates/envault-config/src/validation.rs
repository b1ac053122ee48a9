// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::EnvaultConfig;

/// Log levels accepted by `log.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &EnvaultConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.store.data_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.data_dir must not be empty".to_string(),
        });
    }

    let file = config.store.database_file.trim();
    if file.is_empty() {
        errors.push(ConfigError::Validation {
            message: "store.database_file must not be empty".to_string(),
        });
    } else if file.contains('/') || file.contains('\\') {
        errors.push(ConfigError::Validation {
            message: format!(
                "store.database_file `{file}` must be a file name; set store.data_dir for the directory"
            ),
        });
    }

    if config.keyring.service.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "keyring.service must not be empty".to_string(),
        });
    }

    if let Some(user) = &config.keyring.user
        && user.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "keyring.user must not be empty when set".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
