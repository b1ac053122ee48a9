// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realm name validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::EnvaultError;

static REALM_RE: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII word characters plus the separators used for nested realms.
    Regex::new(r"^[-:/A-Za-z0-9_]+$").expect("realm pattern is valid")
});

/// Check that `realm` only contains word characters, `-`, `:` and `/`.
pub fn validate_realm(realm: &str) -> Result<(), EnvaultError> {
    if REALM_RE.is_match(realm) {
        Ok(())
    } else {
        Err(EnvaultError::InvalidRealm(realm.to_string()))
    }
}
