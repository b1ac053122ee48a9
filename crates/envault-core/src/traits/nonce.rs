// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nonce Source: fixed-width nonces for each encryption.

use crate::error::EnvaultError;

/// Width of an AES-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Supplies one nonce per seal.
///
/// Production sources must be cryptographically random and never repeat for
/// a given key. Deterministic sources are for tests only.
pub trait NonceSource: Send + Sync {
    /// Returns the nonce for the next encryption.
    fn next_nonce(&self) -> Result<[u8; NONCE_LEN], EnvaultError>;
}
