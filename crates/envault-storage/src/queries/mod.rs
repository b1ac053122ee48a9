// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for realm and record rows.
//!
//! Every function takes a connection or transaction and returns owned values.

pub mod realms;
pub mod records;
