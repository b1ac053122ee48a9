// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM envelope sealing for the Envault secret store.
//!
//! A per-user master key lives in the OS credential vault (see
//! [`KeychainRing`]). Every value is encoded, hashed, and encrypted with the
//! hex digest as associated data, so a record's metadata is bound to its
//! ciphertext and cannot be edited or swapped without failing decryption.

pub mod crypto;
pub mod keychain;
pub mod nonce;
pub mod sealer;

pub use keychain::{KeyGenerator, KeychainRing, SystemKeyGenerator, current_username};
pub use nonce::SystemNonce;
pub use sealer::Sealer;
