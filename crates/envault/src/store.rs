// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store facade: realm-level operations over the sealer and the record store.

use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

use envault_config::model::EnvaultConfig;
use envault_core::{
    EnvaultError, ErrorContext, RecordStore, StoredRealm, UnsealedValue, validate_realm,
};
use envault_storage::SqliteStore;
use envault_vault::Sealer;
use tracing::{debug, warn};

use crate::render;

/// File name used by [`Envault::open_with_sealer`].
pub const DEFAULT_DATABASE_FILE: &str = "envault.db";

/// The local secure variable store.
///
/// Every call is a single storage transaction; nothing is cached between
/// calls. Closing is idempotent and also happens on drop.
pub struct Envault {
    store: Box<dyn RecordStore>,
    sealer: Sealer,
    closed: bool,
}

impl std::fmt::Debug for Envault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envault")
            .field("sealer", &self.sealer)
            .field("closed", &self.closed)
            .finish()
    }
}

impl Envault {
    /// Open the configured store with the keychain-backed sealer.
    pub fn open(config: &EnvaultConfig) -> Result<Self, EnvaultError> {
        let sealer = Sealer::with_defaults(&config.keyring)?;
        let store = SqliteStore::open(config.store.database_path(), config.store.wal_mode)?;
        Ok(Self::with_store(Box::new(store), sealer))
    }

    /// Open `<dir>/envault.db` with a caller-supplied sealer.
    pub fn open_with_sealer(dir: impl AsRef<Path>, sealer: Sealer) -> Result<Self, EnvaultError> {
        let store = SqliteStore::open(dir.as_ref().join(DEFAULT_DATABASE_FILE), true)?;
        Ok(Self::with_store(Box::new(store), sealer))
    }

    pub fn with_store(store: Box<dyn RecordStore>, sealer: Sealer) -> Self {
        Self {
            store,
            sealer,
            closed: false,
        }
    }

    /// Login name of the user whose key seals this store.
    pub fn current_user(&self) -> &str {
        self.sealer.username()
    }

    /// Seal and store every pair in one transaction, creating the realm if
    /// needed and overwriting existing keys.
    pub fn add<I, K, V>(&self, realm: &str, vars: I) -> Result<(), EnvaultError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        validate_realm(realm)?;

        let mut batch = StoredRealm::new();
        for (key, value) in vars {
            let key = key.into();
            let record = self
                .sealer
                .seal(value.as_ref())
                .with_context(|| format!("sealing {realm}/{key}"))?;
            batch.insert(key, record);
        }

        self.store
            .set_keys(realm, &batch)
            .with_context(|| format!("storing {realm}"))?;
        debug!(realm, count = batch.len(), "added variables");
        Ok(())
    }

    /// Seal and store a single variable.
    pub fn set(&self, realm: &str, key: &str, value: &str) -> Result<(), EnvaultError> {
        validate_realm(realm)?;

        let record = self
            .sealer
            .seal(value)
            .with_context(|| format!("sealing {realm}/{key}"))?;
        self.store
            .set_key(realm, key, &record)
            .with_context(|| format!("storing {realm}/{key}"))?;
        debug!(realm, key, "set variable");
        Ok(())
    }

    /// Decrypt a single variable.
    pub fn get(&self, realm: &str, key: &str) -> Result<String, EnvaultError> {
        let record = self
            .store
            .get_key(realm, key)
            .with_context(|| format!("fetching {realm}/{key}"))?;
        let value = self
            .sealer
            .unseal(&record)
            .with_context(|| format!("unsealing {realm}/{key}"))?;
        Ok(value.data)
    }

    fn fetch_raw(&self, realm: &str) -> Result<BTreeMap<String, UnsealedValue>, EnvaultError> {
        let records = self
            .store
            .get_all_keys(realm)
            .with_context(|| format!("fetching {realm}"))?;

        records
            .into_iter()
            .map(|(key, record)| {
                let value = self
                    .sealer
                    .unseal(&record)
                    .with_context(|| format!("unsealing {realm}/{key}"))?;
                Ok::<_, EnvaultError>((key, value))
            })
            .collect()
    }

    /// Every variable in a realm. One bad record fails the whole call.
    pub fn fetch(&self, realm: &str) -> Result<BTreeMap<String, String>, EnvaultError> {
        Ok(self
            .fetch_raw(realm)?
            .into_iter()
            .map(|(key, value)| (key, value.data))
            .collect())
    }

    /// The realm as a JSON object of string values.
    pub fn fetch_as_json(&self, realm: &str) -> Result<serde_json::Value, EnvaultError> {
        let vars = self.fetch(realm)?;
        Ok(serde_json::Value::Object(
            vars.into_iter()
                .map(|(k, v)| (k, serde_json::Value::String(v)))
                .collect(),
        ))
    }

    /// The realm as `KEY=VALUE` strings, sorted by key, for a child's environment.
    pub fn fetch_as_var_list(&self, realm: &str) -> Result<Vec<String>, EnvaultError> {
        Ok(self
            .fetch(realm)?
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect())
    }

    /// Remove one variable. Missing keys are fine; a missing realm is not.
    pub fn drop_key(&self, realm: &str, key: &str) -> Result<(), EnvaultError> {
        self.store
            .drop_key(realm, key)
            .with_context(|| format!("dropping {realm}/{key}"))
    }

    /// Remove a realm and everything in it.
    pub fn purge(&self, realm: &str) -> Result<(), EnvaultError> {
        self.store
            .purge(realm)
            .with_context(|| format!("purging {realm}"))
    }

    /// All realm names, sorted.
    pub fn realms(&self) -> Result<Vec<String>, EnvaultError> {
        let mut realms = self
            .store
            .list_realms()
            .with_context(|| "listing realms")?;
        realms.sort();
        Ok(realms)
    }

    /// Write one row per variable: key, seal time, size, and hash prefix,
    /// plus the plaintext when `show_decrypted` is set.
    ///
    /// With `key` set only that variable is listed; an unknown key lists
    /// nothing.
    pub fn list<W: Write + ?Sized>(
        &self,
        w: &mut W,
        realm: &str,
        key: Option<&str>,
        show_decrypted: bool,
    ) -> Result<(), EnvaultError> {
        let values = self.fetch_raw(realm)?;
        let selected: Vec<(&String, &UnsealedValue)> = values
            .iter()
            .filter(|(k, _)| key.is_none_or(|wanted| wanted == k.as_str()))
            .collect();

        let key_width = selected.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let max_size = selected
            .iter()
            .map(|(_, v)| v.metadata.size)
            .max()
            .unwrap_or(0);
        let size_width = render::size_width(max_size);

        for (k, v) in selected {
            let value = show_decrypted.then_some(v.data.as_str());
            render::write_row(w, k, key_width, &v.metadata, size_width, value)
                .map_err(|e| EnvaultError::storage(e).context(format!("listing {realm}")))?;
        }
        Ok(())
    }

    /// Import a JSON object of string values into `realm`.
    pub fn read_json<R: Read>(&self, reader: R, realm: &str) -> Result<(), EnvaultError> {
        let vars: BTreeMap<String, String> = serde_json::from_reader(reader)
            .map_err(|e| EnvaultError::Encoding(format!("reading JSON for {realm}: {e}")))?;
        self.add(realm, vars)
    }

    /// Export `realm` as a pretty-printed JSON object.
    ///
    /// With `unquote` set, values that are themselves JSON objects or arrays
    /// are inlined instead of written as escaped strings.
    pub fn write_json<W: Write>(
        &self,
        mut writer: W,
        realm: &str,
        unquote: bool,
    ) -> Result<(), EnvaultError> {
        let mut vars = self.fetch_as_json(realm)?;
        if unquote && let serde_json::Value::Object(map) = &mut vars {
            for value in map.values_mut() {
                inline_embedded_json(value);
            }
        }
        serde_json::to_writer_pretty(&mut writer, &vars)
            .map_err(|e| EnvaultError::Encoding(format!("writing JSON for {realm}: {e}")))?;
        writeln!(writer).map_err(EnvaultError::storage)?;
        Ok(())
    }

    /// Flush and release the store file. Later calls fail with a storage error.
    pub fn close(&mut self) -> Result<(), EnvaultError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.store.close()
    }
}

fn inline_embedded_json(value: &mut serde_json::Value) {
    let serde_json::Value::String(text) = value else {
        return;
    };
    if let Ok(parsed @ (serde_json::Value::Object(_) | serde_json::Value::Array(_))) =
        serde_json::from_str(text)
    {
        *value = parsed;
    }
}

impl Drop for Envault {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close store");
        }
    }
}
