// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Envault configuration system.

use envault_config::diagnostic::ConfigError;
use envault_config::model::EnvaultConfig;
use envault_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_envault_config() {
    let toml = r#"
[store]
data_dir = "/tmp/envault-test"
database_file = "vars.db"
wal_mode = false

[keyring]
service = "envault-test"
user = "ci"

[log]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.store.data_dir, "/tmp/envault-test");
    assert_eq!(config.store.database_file, "vars.db");
    assert!(!config.store.wal_mode);
    assert_eq!(config.keyring.service, "envault-test");
    assert_eq!(config.keyring.user.as_deref(), Some("ci"));
    assert_eq!(config.log.level, "debug");
}

/// Sections left out of the file keep their defaults.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("[log]\nlevel = \"info\"\n").unwrap();
    let defaults = EnvaultConfig::default();
    assert_eq!(config.store.data_dir, defaults.store.data_dir);
    assert_eq!(config.keyring.service, "envault-secret-key");
    assert_eq!(config.log.level, "info");
}

/// Unknown keys are rejected at load time.
#[test]
fn unknown_field_in_keyring_produces_error() {
    let err = load_config_from_str("[keyring]\nservce = \"x\"\n").expect_err("should reject");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("servce"),
        "got: {err_str}"
    );
}

#[test]
fn deny_unknown_fields_at_top_level() {
    assert!(load_config_from_str("[vault]\nkdf = 1\n").is_err());
}

/// Diagnostics carry the bad key, a suggestion, and the valid keys.
#[test]
fn diagnostic_error_includes_suggestion_and_valid_keys() {
    let errors = load_and_validate_str("[keyring]\nservce = \"x\"\n").expect_err("should fail");
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "servce"
                && suggestion.as_deref() == Some("service")
                && valid_keys.contains("user")
        })
    });
    assert!(found, "expected UnknownKey for servce, got: {errors:?}");
}

#[test]
fn diagnostic_invalid_type_message() {
    let errors = load_and_validate_str("[store]\nwal_mode = \"yes\"\n").expect_err("should fail");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("wal_mode"))),
        "got: {errors:?}"
    );
}

#[test]
fn validation_errors_surface_from_load_and_validate() {
    let errors = load_and_validate_str("[log]\nlevel = \"chatty\"\n").expect_err("should fail");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("log.level"))));
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "servce".to_string(),
        suggestion: Some("service".to_string()),
        valid_keys: "service, user".to_string(),
        span: None,
        src: None,
    };
    assert!(error.code().is_some());
    let help = error.help().expect("help text").to_string();
    assert!(help.contains("did you mean `service`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("render should succeed");
    assert!(buf.contains("servce"));
}

/// A config file on disk is picked up by path.
#[test]
fn load_from_explicit_path() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[store]\ndatabase_file = \"custom.db\"\n")?;
        let config = load_config_from_path(std::path::Path::new("custom.toml"))
            .expect("should load custom.toml");
        assert_eq!(config.store.database_file, "custom.db");
        Ok(())
    });
}
