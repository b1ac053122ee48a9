// SPDX-FileCopyrightText: 2026 Envault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the store facade against a real store file.

use std::collections::BTreeMap;

use envault::{Envault, EnvaultError};
use envault_test_utils::{CountingNonce, StaticRing, temp_store_dir};
use envault_vault::Sealer;
use tempfile::TempDir;

fn sealer() -> Sealer {
    Sealer::new(
        Box::new(StaticRing::filled(0x11).with_username("matt")),
        Box::new(CountingNonce::new()),
    )
    .unwrap()
}

fn open(dir: &TempDir) -> Envault {
    Envault::open_with_sealer(dir.path(), sealer()).unwrap()
}

fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn add_fetch_drop_purge() {
    let dir = temp_store_dir().unwrap();
    let mut store = open(&dir);

    store.add("top", map(&[("a", "b")])).unwrap();
    assert_eq!(store.fetch("top").unwrap(), map(&[("a", "b")]));

    store.drop_key("top", "a").unwrap();
    assert!(store.fetch("top").unwrap().is_empty());

    store.purge("top").unwrap();
    let err = store.fetch("top").unwrap_err();
    assert!(err.is_not_found(), "got: {err}");

    store.close().unwrap();
}

#[test]
fn set_overwrites_and_survives_reopen() {
    let dir = temp_store_dir().unwrap();
    let expected = map(&[("age", "58"), ("key", "0x77e3"), ("name", "matt")]);

    {
        let store = open(&dir);
        store.add("data", map(&[("name", "matt"), ("age", "57")])).unwrap();
        store.set("data", "age", "58").unwrap();
        store.set("data", "key", "0x77e3").unwrap();
        assert_eq!(store.current_user(), "matt");
    }

    let mut store = open(&dir);
    assert_eq!(store.fetch("data").unwrap(), expected);
    assert_eq!(store.get("data", "key").unwrap(), "0x77e3");
    store.close().unwrap();
}

#[test]
fn list_is_sorted_and_padded() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    store
        .add("top", map(&[("b", "YY"), ("a", "XX"), ("long_key", "0123456789")]))
        .unwrap();

    let mut out = Vec::new();
    store.list(&mut out, "top", None, false).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("a          "), "got: {lines:?}");
    assert!(lines[1].starts_with("b          "), "got: {lines:?}");
    assert!(lines[2].starts_with("long_key   "), "got: {lines:?}");

    // Widest size is 10, so sizes take two columns.
    assert!(lines[0].contains("Z   2  "), "got: {:?}", lines[0]);
    assert!(lines[2].contains("Z  10  "), "got: {:?}", lines[2]);

    // Every metadata column starts at the same offset.
    let offsets: Vec<usize> = lines.iter().map(|l| l.find("20").unwrap()).collect();
    assert!(offsets.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn list_decrypted_appends_values() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    store.add("top", map(&[("a", "xxx"), ("b", "yyy")])).unwrap();

    let mut out = Vec::new();
    store.list(&mut out, "top", None, true).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('a') && lines[0].ends_with("   xxx"));
    assert!(lines[1].starts_with('b') && lines[1].ends_with("   yyy"));
}

#[test]
fn realms_are_sorted() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    for realm in ["zeta", "alpha", "mid:dle/x"] {
        store.set(realm, "k", "v").unwrap();
    }
    assert_eq!(store.realms().unwrap(), vec!["alpha", "mid:dle/x", "zeta"]);
}

#[test]
fn json_import_and_export() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);

    store
        .read_json(r#"{"x":"21", "y":"14"}"#.as_bytes(), "test")
        .unwrap();
    assert_eq!(store.fetch("test").unwrap(), map(&[("x", "21"), ("y", "14")]));

    store.read_json(r#"{"x":"22"}"#.as_bytes(), "test").unwrap();
    assert_eq!(store.get("test", "x").unwrap(), "22");
    assert_eq!(store.get("test", "y").unwrap(), "14");

    let mut out = Vec::new();
    store.write_json(&mut out, "test", false).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(parsed, serde_json::json!({"x": "22", "y": "14"}));
    assert!(out.ends_with(b"\n"));
}

#[test]
fn var_list_for_exec() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    store.add("aws", map(&[("REGION", "eu"), ("KEY", "k=v")])).unwrap();
    assert_eq!(
        store.fetch_as_var_list("aws").unwrap(),
        vec!["KEY=k=v", "REGION=eu"]
    );
}

#[test]
fn other_users_key_cannot_read_store() {
    let dir = temp_store_dir().unwrap();
    {
        let store = open(&dir);
        store.set("top", "a", "secret").unwrap();
    }

    let other = Sealer::new(Box::new(StaticRing::filled(0x22)), Box::new(CountingNonce::new()))
        .unwrap();
    let store = Envault::open_with_sealer(dir.path(), other).unwrap();
    let err = store.get("top", "a").unwrap_err();
    assert!(err.is_authentication_failure());
    assert_eq!(
        err.to_string(),
        "unsealing top/a: authentication failed -- wrong key or tampered record"
    );
    assert!(store.fetch("top").unwrap_err().is_authentication_failure());
}

#[test]
fn unicode_and_empty_values_roundtrip() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    let values = map(&[("empty", ""), ("emoji", "🔐 clé"), ("quote", "\"x\"\n")]);
    store.add("u", values.clone()).unwrap();
    assert_eq!(store.fetch("u").unwrap(), values);
}

#[test]
fn invalid_realm_is_rejected() {
    let dir = temp_store_dir().unwrap();
    let store = open(&dir);
    assert!(matches!(
        store.set("has space", "a", "b"),
        Err(EnvaultError::InvalidRealm(_))
    ));
}
