// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic Nonce Sources. Never use outside tests.

use std::sync::atomic::{AtomicU64, Ordering};

use envault_core::{EnvaultError, NonceSource, NONCE_LEN};

/// Always yields the same nonce.
#[derive(Debug, Clone, Copy)]
pub struct FixedNonce(pub [u8; NONCE_LEN]);

impl FixedNonce {
    /// A nonce of all zero bytes.
    pub fn zeroes() -> Self {
        Self([0u8; NONCE_LEN])
    }
}

impl NonceSource for FixedNonce {
    fn next_nonce(&self) -> Result<[u8; NONCE_LEN], EnvaultError> {
        Ok(self.0)
    }
}

/// Yields 0, 1, 2, ... as a big-endian counter in the last eight bytes.
#[derive(Debug, Default)]
pub struct CountingNonce {
    next: AtomicU64,
}

impl CountingNonce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nonces handed out so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl NonceSource for CountingNonce {
    fn next_nonce(&self) -> Result<[u8; NONCE_LEN], EnvaultError> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let mut nonce = [0u8; NONCE_LEN];
        nonce[NONCE_LEN - 8..].copy_from_slice(&n.to_be_bytes());
        Ok(nonce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_nonce_repeats() {
        let source = FixedNonce([9u8; NONCE_LEN]);
        assert_eq!(source.next_nonce().unwrap(), [9u8; NONCE_LEN]);
        assert_eq!(source.next_nonce().unwrap(), [9u8; NONCE_LEN]);
    }

    #[test]
    fn counting_nonce_increments() {
        let source = CountingNonce::new();
        let first = source.next_nonce().unwrap();
        let second = source.next_nonce().unwrap();
        assert_eq!(first[NONCE_LEN - 1], 0);
        assert_eq!(second[NONCE_LEN - 1], 1);
        assert_eq!(source.issued(), 2);
    }
}
