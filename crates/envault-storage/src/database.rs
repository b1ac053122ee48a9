// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! A [`Database`] owns exactly one connection. The store is single-user and
//! single-process, so there is no pool and no background writer.

use std::fs;
use std::path::{Path, PathBuf};

use envault_core::EnvaultError;
use rusqlite::{Connection, Transaction};
use tracing::{debug, info};

use crate::migrations;

/// Map a rusqlite error into the storage error kind.
pub fn map_sql_err(e: rusqlite::Error) -> EnvaultError {
    EnvaultError::storage(e)
}

/// An open store file, or a closed handle that rejects every operation.
#[derive(Debug)]
pub struct Database {
    conn: Option<Connection>,
    path: Option<PathBuf>,
    wal_mode: bool,
}

impl Database {
    /// Open (creating if needed) the store file at `path`.
    ///
    /// The parent directory is created with mode 0700 and the file is
    /// restricted to 0600. Pending migrations are applied before returning.
    pub fn open(path: impl AsRef<Path>, wal_mode: bool) -> Result<Self, EnvaultError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            ensure_private_dir(dir)?;
        }

        let created = !path.exists();
        let conn = Connection::open(path).map_err(map_sql_err)?;
        restrict_file(path)?;

        let db = Self::init(conn, Some(path.to_path_buf()), wal_mode)?;
        if created {
            info!(path = %path.display(), "created new store");
        } else {
            debug!(path = %path.display(), "opened store");
        }
        Ok(db)
    }

    /// A throwaway store that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self, EnvaultError> {
        let conn = Connection::open_in_memory().map_err(map_sql_err)?;
        Self::init(conn, None, false)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>, wal_mode: bool) -> Result<Self, EnvaultError> {
        if wal_mode {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
                .map_err(map_sql_err)?;
            debug!(journal_mode = %mode, "journal mode set");
            conn.pragma_update(None, "synchronous", "NORMAL")
                .map_err(map_sql_err)?;
        }
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(map_sql_err)?;
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(map_sql_err)?;

        migrations::run_migrations(&mut conn)?;

        Ok(Self {
            conn: Some(conn),
            path,
            wal_mode,
        })
    }

    /// Location of the store file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// The live connection, or a storage error once closed.
    pub fn connection(&self) -> Result<&Connection, EnvaultError> {
        self.conn
            .as_ref()
            .ok_or_else(|| EnvaultError::storage("store is closed"))
    }

    /// Run `f` inside a single transaction, committing on success.
    ///
    /// Anything `f` returns must be owned: rows are copied out before the
    /// transaction ends.
    pub fn transact<T, F>(&self, f: F) -> Result<T, EnvaultError>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, EnvaultError>,
    {
        let conn = self.connection()?;
        let tx = conn.unchecked_transaction().map_err(map_sql_err)?;
        let out = f(&tx)?;
        tx.commit().map_err(map_sql_err)?;
        Ok(out)
    }

    /// Checkpoint the WAL and release the file. A second call does nothing.
    pub fn close(&mut self) -> Result<(), EnvaultError> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if self.wal_mode {
            conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
                .map_err(map_sql_err)?;
            debug!("close: WAL checkpoint complete");
        }
        conn.close().map_err(|(_, e)| map_sql_err(e))?;
        Ok(())
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(error = %e, "failed to close store cleanly");
        }
    }
}

fn ensure_private_dir(dir: &Path) -> Result<(), EnvaultError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(EnvaultError::storage(format!(
                "{} exists and is not a directory",
                dir.display()
            )));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(EnvaultError::storage(e)),
    }

    fs::create_dir_all(dir).map_err(EnvaultError::storage)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))
            .map_err(EnvaultError::storage)?;
    }
    Ok(())
}

fn restrict_file(path: &Path) -> Result<(), EnvaultError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .map_err(EnvaultError::storage)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_private_directory_and_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("store.db");
        let db = Database::open(&path, true).unwrap();
        assert_eq!(db.path(), Some(path.as_path()));
        assert!(path.exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let dir_mode = fs::metadata(path.parent().unwrap()).unwrap().permissions().mode();
            let file_mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(dir_mode & 0o777, 0o700);
            assert_eq!(file_mode & 0o777, 0o600);
        }
    }

    #[test]
    fn parent_that_is_a_file_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();
        let err = Database::open(blocker.join("store.db"), true).unwrap_err();
        assert!(err.to_string().contains("not a directory"), "got: {err}");
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let db = Database::open_in_memory().unwrap();
        let fk: i64 = db
            .connection()
            .unwrap()
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn close_is_idempotent_and_blocks_later_use() {
        let mut db = Database::open_in_memory().unwrap();
        db.close().unwrap();
        db.close().unwrap();
        assert!(db.is_closed());
        assert!(matches!(db.connection(), Err(EnvaultError::Storage { .. })));
        assert!(db.transact(|_| Ok(())).is_err());
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        let result: Result<(), EnvaultError> = db.transact(|tx| {
            tx.execute("INSERT INTO realms (name) VALUES ('top')", [])
                .map_err(map_sql_err)?;
            Err(EnvaultError::Internal("abort".into()))
        });
        assert!(result.is_err());

        let count: i64 = db
            .connection()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM realms", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
