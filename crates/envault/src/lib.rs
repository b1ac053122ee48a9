// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Envault: a local secure store for environment variables.
//!
//! Variables are key-value pairs grouped into realms. Every value is sealed
//! with AES-256-GCM under a per-user key held in the OS keychain, and stored
//! in a single SQLite file in the user's config directory.
//!
//! ```no_run
//! # fn main() -> Result<(), envault::EnvaultError> {
//! let config = envault_config::model::EnvaultConfig::default();
//! let mut store = envault::Envault::open(&config)?;
//! store.set("aws", "AWS_REGION", "eu-west-1")?;
//! assert_eq!(store.get("aws", "AWS_REGION")?, "eu-west-1");
//! store.close()?;
//! # Ok(())
//! # }
//! ```

pub mod exec;
pub mod extract;
pub mod render;
pub mod store;

pub use envault_core::EnvaultError;
pub use store::Envault;
