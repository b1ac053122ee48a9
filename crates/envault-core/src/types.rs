// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record model shared by the sealer, the storage engine, and the facade.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Integrity metadata produced fresh on every seal.
///
/// `hash` is the hex digest of the canonically encoded plaintext. Its raw
/// bytes are the AEAD associated data, so the stored metadata cannot be edited
/// without breaking decryption.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Byte length of the plaintext value before encoding.
    pub size: usize,
    /// Hex digest of the canonical encoding of the value.
    pub hash: String,
    /// Unix time (seconds) at which the record was sealed.
    pub timestamp: i64,
}

impl RecordMeta {
    /// Render as `<RFC3339 time>  <size>  <hash prefix>`, with the size
    /// right-aligned to `size_width` columns.
    pub fn render(&self, size_width: usize) -> String {
        if self.hash.is_empty() {
            return "unprepared".to_string();
        }

        let when = DateTime::<Utc>::from_timestamp(self.timestamp, 0)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_else(|| self.timestamp.to_string());
        let short = self.hash.get(..7).unwrap_or(&self.hash);

        format!("{when}  {:>size_width$}  {short}", self.size)
    }
}

impl fmt::Display for RecordMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(3))
    }
}

/// The ciphertext + metadata pair persisted on disk for one key.
///
/// Serialized to JSON as `{"data": ..., "metadata": ...}` for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedRecord {
    /// base64 of `nonce || ciphertext || tag`.
    pub data: String,
    /// base64 of the JSON-encoded [`RecordMeta`].
    pub metadata: String,
}

/// A decrypted value together with its verified metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsealedValue {
    pub data: String,
    pub metadata: RecordMeta,
}

/// All sealed records of one realm, keyed by record key.
pub type StoredRealm = BTreeMap<String, SealedRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(size: usize) -> RecordMeta {
        RecordMeta {
            size,
            hash: "4f1e2a9c0b7d3e5f".into(),
            timestamp: 1_600_000_000,
        }
    }

    #[test]
    fn render_pads_size_and_truncates_hash() {
        assert_eq!(meta(2).render(3), "2020-09-13T12:26:40Z    2  4f1e2a9");
        assert_eq!(meta(120).render(3), "2020-09-13T12:26:40Z  120  4f1e2a9");
    }

    #[test]
    fn display_uses_three_column_size() {
        assert_eq!(meta(5).to_string(), meta(5).render(3));
    }

    #[test]
    fn empty_hash_renders_unprepared() {
        assert_eq!(RecordMeta::default().render(1), "unprepared");
    }

    #[test]
    fn short_hash_is_not_sliced_past_end() {
        let m = RecordMeta {
            size: 1,
            hash: "abc".into(),
            timestamp: 0,
        };
        assert_eq!(m.render(1), "1970-01-01T00:00:00Z  1  abc");
    }

    #[test]
    fn sealed_record_uses_on_disk_field_names() {
        let rec = SealedRecord {
            data: "ZGF0YQ==".into(),
            metadata: "bWV0YQ==".into(),
        };
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"data":"ZGF0YQ==","metadata":"bWV0YQ=="}"#);
    }

    #[test]
    fn metadata_uses_on_disk_field_names() {
        let json = serde_json::to_value(meta(4)).unwrap();
        assert_eq!(json["size"], 4);
        assert_eq!(json["hash"], "4f1e2a9c0b7d3e5f");
        assert_eq!(json["timestamp"], 1_600_000_000);
    }
}
