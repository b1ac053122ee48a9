// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use std::path::Path;

use envault_core::{EnvaultError, RecordStore, SealedRecord, StoredRealm};
use rusqlite::Connection;
use tracing::{debug, info};

use crate::database::{Database, map_sql_err};
use crate::queries::{realms, records};

/// SQLite-backed record store.
///
/// Wraps a [`Database`] handle and delegates row access to the typed query
/// modules. Each trait method is exactly one transaction.
#[derive(Debug)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open or create the store file at `path`.
    pub fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, EnvaultError> {
        Ok(Self {
            db: Database::open(path, wal_mode)?,
        })
    }

    pub fn open_in_memory() -> Result<Self, EnvaultError> {
        Ok(Self {
            db: Database::open_in_memory()?,
        })
    }

    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn encode(realm: &str, key: &str, record: &SealedRecord) -> Result<Vec<u8>, EnvaultError> {
    serde_json::to_vec(record)
        .map_err(|e| EnvaultError::Encoding(format!("{realm}/{key}: {e}")))
}

fn decode(realm: &str, key: &str, bytes: &[u8]) -> Result<SealedRecord, EnvaultError> {
    serde_json::from_slice(bytes)
        .map_err(|e| EnvaultError::CorruptRecord(format!("{realm}/{key}: {e}")))
}

fn require_realm(conn: &Connection, realm: &str) -> Result<(), EnvaultError> {
    if realms::realm_exists(conn, realm).map_err(map_sql_err)? {
        Ok(())
    } else {
        Err(EnvaultError::NotFound(format!("realm {realm}")))
    }
}

fn write_records<'a>(
    conn: &Connection,
    realm: &str,
    entries: impl IntoIterator<Item = (&'a str, &'a SealedRecord)>,
) -> Result<(), EnvaultError> {
    if realms::ensure_realm(conn, realm).map_err(map_sql_err)? {
        info!(realm, "created realm");
    }
    for (key, record) in entries {
        let value = encode(realm, key, record)?;
        records::upsert_record(conn, realm, key, &value).map_err(map_sql_err)?;
    }
    Ok(())
}

impl RecordStore for SqliteStore {
    fn set_key(&self, realm: &str, key: &str, record: &SealedRecord) -> Result<(), EnvaultError> {
        self.db.transact(|tx| write_records(tx, realm, [(key, record)]))?;
        debug!(realm, key, "stored record");
        Ok(())
    }

    fn set_keys(&self, realm: &str, batch: &StoredRealm) -> Result<(), EnvaultError> {
        self.db.transact(|tx| {
            write_records(tx, realm, batch.iter().map(|(k, r)| (k.as_str(), r)))
        })?;
        debug!(realm, count = batch.len(), "stored records");
        Ok(())
    }

    fn get_key(&self, realm: &str, key: &str) -> Result<SealedRecord, EnvaultError> {
        self.db.transact(|tx| {
            require_realm(tx, realm)?;
            match records::get_record(tx, realm, key).map_err(map_sql_err)? {
                Some(bytes) => decode(realm, key, &bytes),
                None => Err(EnvaultError::NotFound(format!("{realm}/{key}"))),
            }
        })
    }

    fn get_all_keys(&self, realm: &str) -> Result<StoredRealm, EnvaultError> {
        self.db.transact(|tx| {
            require_realm(tx, realm)?;
            records::all_records(tx, realm)
                .map_err(map_sql_err)?
                .into_iter()
                .map(|(key, bytes)| {
                    let record = decode(realm, &key, &bytes)?;
                    Ok::<_, EnvaultError>((key, record))
                })
                .collect()
        })
    }

    fn drop_key(&self, realm: &str, key: &str) -> Result<(), EnvaultError> {
        let removed = self.db.transact(|tx| {
            require_realm(tx, realm)?;
            records::delete_record(tx, realm, key).map_err(map_sql_err)
        })?;
        debug!(realm, key, removed, "dropped record");
        Ok(())
    }

    fn purge(&self, realm: &str) -> Result<(), EnvaultError> {
        self.db.transact(|tx| {
            if realms::delete_realm(tx, realm).map_err(map_sql_err)? {
                Ok(())
            } else {
                Err(EnvaultError::NotFound(format!("realm {realm}")))
            }
        })?;
        info!(realm, "purged realm");
        Ok(())
    }

    fn list_keys(&self, realm: &str) -> Result<Vec<String>, EnvaultError> {
        self.db.transact(|tx| {
            require_realm(tx, realm)?;
            records::list_keys(tx, realm).map_err(map_sql_err)
        })
    }

    fn list_realms(&self) -> Result<Vec<String>, EnvaultError> {
        self.db
            .transact(|tx| realms::list_realms(tx).map_err(map_sql_err))
    }

    fn close(&mut self) -> Result<(), EnvaultError> {
        self.db.close()
    }
}
