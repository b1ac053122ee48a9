// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret Ring: the source of the per-user master key.

use zeroize::Zeroizing;

use crate::error::EnvaultError;

/// Supplies raw key material, typically from the OS credential vault.
///
/// Implementations must be idempotent: every call in the lifetime of a
/// process returns the same bytes, generating and persisting a fresh secret
/// only on the first-ever call for a user.
pub trait SecretRing: Send + Sync {
    /// Returns the master secret.
    fn secret(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError>;

    /// Returns the login name the secret belongs to.
    fn username(&self) -> &str;
}
