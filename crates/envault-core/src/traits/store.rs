// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait implemented by the storage engine.

use crate::error::EnvaultError;
use crate::types::{SealedRecord, StoredRealm};

/// Durable realm -> key -> sealed record persistence.
///
/// Every method runs in its own transaction; none is held open across calls.
/// Returned values are owned copies, never views into engine buffers.
pub trait RecordStore: Send {
    /// Upsert one record, creating the realm if needed.
    fn set_key(&self, realm: &str, key: &str, record: &SealedRecord) -> Result<(), EnvaultError>;

    /// Upsert a batch of records atomically: all land or none do.
    fn set_keys(&self, realm: &str, records: &StoredRealm) -> Result<(), EnvaultError>;

    /// Fetch one record. `NotFound` if the realm or key is absent.
    fn get_key(&self, realm: &str, key: &str) -> Result<SealedRecord, EnvaultError>;

    /// Fetch every record in a realm. `NotFound` if the realm is absent.
    fn get_all_keys(&self, realm: &str) -> Result<StoredRealm, EnvaultError>;

    /// Delete one record. `NotFound` if the realm is absent; an absent key is a no-op.
    fn drop_key(&self, realm: &str, key: &str) -> Result<(), EnvaultError>;

    /// Delete a realm and all of its records. `NotFound` if the realm is absent.
    fn purge(&self, realm: &str) -> Result<(), EnvaultError>;

    /// Keys in a realm, in engine order. `NotFound` if the realm is absent.
    fn list_keys(&self, realm: &str) -> Result<Vec<String>, EnvaultError>;

    /// All realm names, in engine order.
    fn list_realms(&self) -> Result<Vec<String>, EnvaultError>;

    /// Flush and release the underlying file. Calling it twice is harmless.
    fn close(&mut self) -> Result<(), EnvaultError>;
}
