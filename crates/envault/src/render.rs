// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Column layout for realm listings.

use std::io::{self, Write};

use envault_core::RecordMeta;

/// Decimal width of `max_size`, used to right-align the size column.
///
/// An all-empty realm still gets one column.
pub fn size_width(max_size: usize) -> usize {
    max_size.checked_ilog10().map_or(1, |digits| digits as usize + 1)
}

/// Write one listing row: key padded to `key_width`, then the metadata, then
/// the plaintext when one is given.
pub fn write_row<W: Write + ?Sized>(
    w: &mut W,
    key: &str,
    key_width: usize,
    meta: &RecordMeta,
    size_width: usize,
    value: Option<&str>,
) -> io::Result<()> {
    let meta = meta.render(size_width);
    match value {
        Some(value) => writeln!(w, "{key:<key_width$}   {meta}   {value}"),
        None => writeln!(w, "{key:<key_width$}   {meta}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_width_counts_digits() {
        assert_eq!(size_width(0), 1);
        assert_eq!(size_width(1), 1);
        assert_eq!(size_width(9), 1);
        assert_eq!(size_width(10), 2);
        assert_eq!(size_width(999), 3);
        assert_eq!(size_width(1000), 4);
    }

    #[test]
    fn row_pads_key_and_appends_value() {
        let meta = RecordMeta {
            size: 3,
            hash: "abcdef0123".into(),
            timestamp: 0,
        };
        let mut out = Vec::new();
        write_row(&mut out, "a", 4, &meta, 2, Some("xxx")).unwrap();
        write_row(&mut out, "long", 4, &meta, 2, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "a      1970-01-01T00:00:00Z   3  abcdef0   xxx\n\
             long   1970-01-01T00:00:00Z   3  abcdef0\n"
        );
    }
}
