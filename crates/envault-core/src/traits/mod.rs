// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits the sealer and facade are constructed with.

pub mod nonce;
pub mod ring;
pub mod store;

pub use nonce::{NonceSource, NONCE_LEN};
pub use ring::SecretRing;
pub use store::RecordStore;
