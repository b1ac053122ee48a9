// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite storage engine for the Envault secret store.
//!
//! Provides a single-file store with embedded migrations, one transaction per
//! operation, and owned copies of every row it returns. Realms map to rows in
//! `realms`; sealed records live in `records` and are removed with their realm.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
