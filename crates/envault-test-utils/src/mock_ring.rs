// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory Secret Ring for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use envault_core::{EnvaultError, SecretRing};
use zeroize::Zeroizing;

/// A Secret Ring that hands out the same bytes every time.
///
/// Counts how often the secret was requested so tests can check that the
/// sealer fetches it only once.
#[derive(Debug)]
pub struct StaticRing {
    secret: Vec<u8>,
    username: String,
    calls: AtomicUsize,
}

impl StaticRing {
    /// A ring holding `secret` for user `tester`.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            username: "tester".to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    /// A ring holding 32 bytes of `byte`.
    pub fn filled(byte: u8) -> Self {
        Self::new(vec![byte; 32])
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Number of times [`SecretRing::secret`] has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SecretRing for StaticRing {
    fn secret(&self) -> Result<Zeroizing<Vec<u8>>, EnvaultError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Zeroizing::new(self.secret.clone()))
    }

    fn username(&self) -> &str {
        &self.username
    }
}
