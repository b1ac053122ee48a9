// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Envault secret store.
//!
//! This crate provides the error taxonomy, the sealed/unsealed record model,
//! realm name validation, and the capability traits that the vault, storage,
//! and facade crates are written against. Keeping the Secret Ring and Nonce
//! Source behind traits lets tests inject deterministic fakes without touching
//! the OS credential vault or the system RNG.

pub mod error;
pub mod realm;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{EnvaultError, ErrorContext};
pub use realm::validate_realm;
pub use traits::{NonceSource, RecordStore, SecretRing, NONCE_LEN};
pub use types::{RecordMeta, SealedRecord, StoredRealm, UnsealedValue};
