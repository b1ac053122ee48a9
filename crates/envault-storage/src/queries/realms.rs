// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realm row operations.

use rusqlite::{Connection, OptionalExtension, params};

/// Whether a realm row exists.
pub fn realm_exists(conn: &Connection, realm: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM realms WHERE name = ?1",
        params![realm],
        |_| Ok(()),
    )
    .optional()
    .map(|row| row.is_some())
}

/// Create the realm if it does not exist yet. Returns true if it was created.
pub fn ensure_realm(conn: &Connection, realm: &str) -> rusqlite::Result<bool> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO realms (name) VALUES (?1)",
        params![realm],
    )?;
    Ok(inserted > 0)
}

/// Delete a realm; its records go with it. Returns true if a row was removed.
pub fn delete_realm(conn: &Connection, realm: &str) -> rusqlite::Result<bool> {
    let deleted = conn.execute("DELETE FROM realms WHERE name = ?1", params![realm])?;
    Ok(deleted > 0)
}

/// All realm names in byte order.
pub fn list_realms(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM realms ORDER BY name")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    rows.collect()
}
