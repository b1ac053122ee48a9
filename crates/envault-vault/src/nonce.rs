// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production Nonce Source backed by the system CSPRNG.

use envault_core::{EnvaultError, NONCE_LEN, NonceSource};
use ring::rand::{SecureRandom, SystemRandom};

/// Draws every nonce from the operating system's random number generator.
#[derive(Debug, Clone)]
pub struct SystemNonce {
    rng: SystemRandom,
}

impl SystemNonce {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemNonce {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceSource for SystemNonce {
    fn next_nonce(&self) -> Result<[u8; NONCE_LEN], EnvaultError> {
        let mut nonce = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce)
            .map_err(|_| EnvaultError::Crypto("failed to generate random nonce".to_string()))?;
        Ok(nonce)
    }
}
