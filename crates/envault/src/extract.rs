// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument parsing for variable assignments and realm paths.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static ASSIGN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<key>[A-Za-z0-9_]+)=(?P<value>.+)$").expect("assignment pattern is valid")
});

/// Leading `KEY=VALUE` arguments, parsed.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Assignments<'a> {
    pub values: BTreeMap<String, String>,
    /// Arguments after the first one that is not an assignment.
    pub rest: &'a [String],
}

/// Consume `KEY=VALUE` arguments until the first one that does not match.
///
/// Keys and values are trimmed. A later duplicate key wins.
pub fn assignments(args: &[String]) -> Assignments<'_> {
    let mut values = BTreeMap::new();
    let mut consumed = 0;

    for arg in args {
        let Some(caps) = ASSIGN_RE.captures(arg) else {
            break;
        };
        values.insert(
            caps["key"].trim().to_string(),
            caps["value"].trim().to_string(),
        );
        consumed += 1;
    }

    Assignments {
        values,
        rest: &args[consumed..],
    }
}

/// Split `realm/key` at the first `/`. A bare realm, or a trailing `/`,
/// yields no key.
pub fn split_path(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((realm, key)) if !key.is_empty() => (realm, Some(key)),
        Some((realm, _)) => (realm, None),
        None => (path, None),
    }
}
