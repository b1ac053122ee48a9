// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envelope sealing: plaintext value <-> [`SealedRecord`].
//!
//! Sealing encodes the value as a JSON string, hashes the encoding with
//! SHA-256, and encrypts it with the hex digest as AEAD associated data. The
//! nonce is prepended to the ciphertext. Both halves of the record are base64.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use envault_config::model::KeyringConfig;
use envault_core::{
    EnvaultError, NONCE_LEN, NonceSource, RecordMeta, SealedRecord, SecretRing, UnsealedValue,
};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::crypto;
use crate::keychain::KeychainRing;
use crate::nonce::SystemNonce;

/// Seals and unseals values under one master key.
///
/// The key is fetched from the ring once, at construction, and held in
/// zeroizing memory until the sealer is dropped.
pub struct Sealer {
    key: Zeroizing<Vec<u8>>,
    ring: Box<dyn SecretRing>,
    nonces: Box<dyn NonceSource>,
}

impl std::fmt::Debug for Sealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealer")
            .field("key", &"[REDACTED]")
            .field("username", &self.ring.username())
            .finish()
    }
}

impl Sealer {
    pub fn new(
        ring: Box<dyn SecretRing>,
        nonces: Box<dyn NonceSource>,
    ) -> Result<Self, EnvaultError> {
        let key = ring.secret()?;
        Ok(Self { key, ring, nonces })
    }

    /// Sealer using the OS keychain and system random nonces.
    pub fn with_defaults(config: &KeyringConfig) -> Result<Self, EnvaultError> {
        let ring = KeychainRing::from_config(config)?;
        Self::new(Box::new(ring), Box::new(SystemNonce::new()))
    }

    /// Login name of the user whose key this sealer holds.
    pub fn username(&self) -> &str {
        self.ring.username()
    }

    /// Encrypt `value` into a fresh record with new metadata.
    pub fn seal(&self, value: &str) -> Result<SealedRecord, EnvaultError> {
        let encoded = serde_json::to_vec(value).map_err(|e| EnvaultError::Encoding(e.to_string()))?;
        let hash = hex::encode(Sha256::digest(&encoded));

        let meta = RecordMeta {
            size: value.len(),
            hash,
            timestamp: Utc::now().timestamp(),
        };

        let nonce = self.nonces.next_nonce()?;
        let ciphertext = crypto::seal_with_aad(&self.key, &nonce, &encoded, meta.hash.as_bytes())?;

        let mut data = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        data.extend_from_slice(&nonce);
        data.extend_from_slice(&ciphertext);

        let meta_json =
            serde_json::to_vec(&meta).map_err(|e| EnvaultError::Encoding(e.to_string()))?;

        Ok(SealedRecord {
            data: BASE64.encode(data),
            metadata: BASE64.encode(meta_json),
        })
    }

    /// Verify and decrypt a record.
    pub fn unseal(&self, record: &SealedRecord) -> Result<UnsealedValue, EnvaultError> {
        let meta_json = BASE64
            .decode(&record.metadata)
            .map_err(|e| EnvaultError::CorruptMetadata(e.to_string()))?;
        let metadata: RecordMeta = serde_json::from_slice(&meta_json)
            .map_err(|e| EnvaultError::CorruptMetadata(e.to_string()))?;

        let raw = BASE64
            .decode(&record.data)
            .map_err(|e| EnvaultError::CorruptRecord(e.to_string()))?;
        if raw.len() < NONCE_LEN {
            return Err(EnvaultError::CorruptRecord(format!(
                "{} bytes is too short to hold a nonce",
                raw.len()
            )));
        }

        let (nonce_bytes, ciphertext) = raw.split_at(NONCE_LEN);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(nonce_bytes);

        let plaintext = Zeroizing::new(crypto::open_with_aad(
            &self.key,
            &nonce,
            ciphertext,
            metadata.hash.as_bytes(),
        )?);

        let data: String =
            serde_json::from_slice(&plaintext).map_err(|e| EnvaultError::Encoding(e.to_string()))?;

        Ok(UnsealedValue { data, metadata })
    }
}
