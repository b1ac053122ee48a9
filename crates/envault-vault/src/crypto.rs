// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations with associated data.
//!
//! Nonces are supplied by the caller. Reusing a nonce under the same key
//! would be catastrophic for GCM security.

use envault_core::{EnvaultError, NONCE_LEN};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};

/// Length in bytes of the GCM authentication tag appended to ciphertext.
pub const TAG_LEN: usize = 16;

fn cipher(key: &[u8]) -> Result<LessSafeKey, EnvaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| {
        EnvaultError::Crypto(format!(
            "AES-256-GCM needs a 32-byte key, got {} bytes",
            key.len()
        ))
    })?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` under `key` and `nonce`, authenticating `aad`.
///
/// Returns the ciphertext with the 16-byte tag appended. The nonce is not
/// included in the output.
pub fn seal_with_aad(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EnvaultError> {
    let cipher = cipher(key)?;
    let nonce = Nonce::assume_unique_for_key(*nonce);

    let mut in_out = plaintext.to_vec();
    cipher
        .seal_in_place_append_tag(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| EnvaultError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok(in_out)
}

/// Decrypt `ciphertext` (with tag) under `key` and `nonce`, verifying `aad`.
///
/// Any mismatch in key, nonce, ciphertext, or associated data yields
/// [`EnvaultError::AuthenticationFailed`].
pub fn open_with_aad(
    key: &[u8],
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>, EnvaultError> {
    let cipher = cipher(key)?;
    let nonce = Nonce::assume_unique_for_key(*nonce);

    let mut in_out = ciphertext.to_vec();
    let plaintext = cipher
        .open_in_place(nonce, Aad::from(aad), &mut in_out)
        .map_err(|_| EnvaultError::AuthenticationFailed)?;

    Ok(plaintext.to_vec())
}
