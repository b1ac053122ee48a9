// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record row operations. Values are opaque bytes at this layer.

use rusqlite::{Connection, OptionalExtension, params};

/// Insert or replace the value stored under `realm`/`key`.
///
/// The realm row must already exist.
pub fn upsert_record(conn: &Connection, realm: &str, key: &str, value: &[u8]) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO records (realm, key, value) VALUES (?1, ?2, ?3)
         ON CONFLICT (realm, key) DO UPDATE SET value = excluded.value",
        params![realm, key, value],
    )?;
    Ok(())
}

/// The value stored under `realm`/`key`, copied out of the row.
pub fn get_record(conn: &Connection, realm: &str, key: &str) -> rusqlite::Result<Option<Vec<u8>>> {
    conn.query_row(
        "SELECT value FROM records WHERE realm = ?1 AND key = ?2",
        params![realm, key],
        |row| row.get::<_, Vec<u8>>(0),
    )
    .optional()
}

/// Every `(key, value)` in a realm, ordered by key.
pub fn all_records(conn: &Connection, realm: &str) -> rusqlite::Result<Vec<(String, Vec<u8>)>> {
    let mut stmt = conn.prepare("SELECT key, value FROM records WHERE realm = ?1 ORDER BY key")?;
    let rows = stmt.query_map(params![realm], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
    })?;
    rows.collect()
}

/// Delete one record. Returns true if a row was removed.
pub fn delete_record(conn: &Connection, realm: &str, key: &str) -> rusqlite::Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM records WHERE realm = ?1 AND key = ?2",
        params![realm, key],
    )?;
    Ok(deleted > 0)
}

/// Keys in a realm, ordered by key.
pub fn list_keys(conn: &Connection, realm: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT key FROM records WHERE realm = ?1 ORDER BY key")?;
    let rows = stmt.query_map(params![realm], |row| row.get::<_, String>(0))?;
    rows.collect()
}
