// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Envault integration tests.
//!
//! Provides deterministic stand-ins for the OS credential vault and the
//! system RNG so sealing can be exercised without external services.
//!
//! # Components
//!
//! - [`StaticRing`] - Secret Ring returning fixed key material
//! - [`FixedNonce`] - Nonce Source that always yields the same nonce
//! - [`CountingNonce`] - Nonce Source yielding an incrementing counter
//! - [`temp_store_dir`] - isolated directory for a throwaway store

pub mod mock_nonce;
pub mod mock_ring;

pub use mock_nonce::{CountingNonce, FixedNonce};
pub use mock_ring::StaticRing;

/// Create a fresh temporary directory for a store.
///
/// The directory is removed when the returned guard is dropped.
pub fn temp_store_dir() -> std::io::Result<tempfile::TempDir> {
    tempfile::Builder::new().prefix("envault-test-").tempdir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_store_dir_is_empty_directory() {
        let dir = temp_store_dir().unwrap();
        assert!(dir.path().is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
