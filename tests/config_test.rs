//! Configuration proxy tests
//!
//! End to end tests for the file-backed configuration proxy: loading,
//! saving, typed accessors and sentinel decoding.

use std::collections::HashMap;
use std::fs;
use std::io::Cursor;

use server_commons::config::proxy::OrInherit;
use server_commons::config::FileConfigurationProxy;

fn proxy_from(content: &str) -> FileConfigurationProxy {
    let mut proxy = FileConfigurationProxy::from_reader(Cursor::new(content.to_string()), None)
        .expect("Failed to read configuration");
    proxy.load().expect("Failed to parse configuration");
    proxy
}

/// Test saving and reloading a configuration file
#[test]
fn test_save_and_reload() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("server.ini");
    fs::write(&path, "[section]\nother = 1\n").expect("Failed to write config");

    let mut proxy =
        FileConfigurationProxy::from_path(&path, None).expect("Failed to open config");
    proxy.load().expect("Failed to parse config");
    proxy.set_string("section", "key", "value");
    proxy.save().expect("Failed to save config");

    // A fresh proxy over the same path sees the stored value.
    let mut reloaded =
        FileConfigurationProxy::from_path(&path, None).expect("Failed to reopen config");
    reloaded.load().expect("Failed to reparse config");

    assert_eq!("value", reloaded.get_string("section", "key").unwrap());
    assert_eq!(1, reloaded.get_integer("section", "other").unwrap());
}

/// Test multi-line values surviving a save/load cycle
#[test]
fn test_save_multi_line_value() {
    let directory = tempfile::tempdir().expect("Failed to create temp dir");
    let path = directory.path().join("server.ini");
    fs::write(&path, "[section]\nkey = value\n").expect("Failed to write config");

    let mut proxy =
        FileConfigurationProxy::from_path(&path, None).expect("Failed to open config");
    proxy.load().expect("Failed to parse config");
    proxy.set_string("section", "banner", "first\nsecond\nthird");
    proxy.save().expect("Failed to save config");

    let mut reloaded =
        FileConfigurationProxy::from_path(&path, None).expect("Failed to reopen config");
    reloaded.load().expect("Failed to reparse config");

    assert_eq!(
        "first\nsecond\nthird",
        reloaded.get_string("section", "banner").unwrap()
    );
}

/// Test error for a missing configuration file
#[test]
fn test_missing_file() {
    let error = FileConfigurationProxy::from_path("no/such/file.ini", None).unwrap_err();

    assert_eq!(1011, error.id());
    assert!(format!("{}", error).contains("file.ini"));
}

/// Test quote stripping on string values
#[test]
fn test_string_quote_stripping() {
    let proxy = proxy_from(
        "[section]\n\
         single = 'spaced value '\n\
         double = \"other value\"\n\
         nested = \"'inner'\"\n\
         mismatched = 'value\"\n",
    );

    // Exactly one layer of matching quotes is removed.
    assert_eq!("spaced value ", proxy.get_string("section", "single").unwrap());
    assert_eq!("other value", proxy.get_string("section", "double").unwrap());
    assert_eq!("'inner'", proxy.get_string("section", "nested").unwrap());
    assert_eq!("'value\"", proxy.get_string("section", "mismatched").unwrap());
}

/// Test sentinel decoding for disabled values
#[test]
fn test_disabled_sentinels() {
    let proxy = proxy_from(
        "[section]\n\
         a = none\n\
         b = Disable\n\
         c = DiSabled\n\
         d = \n\
         e = value\n",
    );

    for option in ["a", "b", "c", "d"] {
        assert_eq!(None, proxy.get_string_or_none("section", option).unwrap());
    }
    assert_eq!(
        Some("value".to_string()),
        proxy.get_string_or_none("section", "e").unwrap()
    );
}

/// Test writing the absent value stores the canonical sentinel
#[test]
fn test_set_string_or_none_round_trip() {
    let mut proxy = proxy_from("[section]\nkey = value\n");

    proxy.set_string_or_none("section", "key", None);

    assert_eq!(
        Some("disabled".to_string()),
        proxy.raw_value("section", "key")
    );
    assert_eq!(None, proxy.get_string_or_none("section", "key").unwrap());
}

/// Test inherit sentinel canonicalization
#[test]
fn test_inherit_canonicalization() {
    let proxy = proxy_from("[section]\nkey = Inherited\n");

    assert_eq!(
        "inherit",
        proxy.get_string_or_inherit("section", "key").unwrap()
    );
}

/// Test boolean accessor over the accepted literal table
#[test]
fn test_boolean_literals() {
    let proxy = proxy_from(
        "[section]\n\
         a = 1\n\
         b = 0\n\
         c = Yes\n\
         d = no\n\
         e = TRUE\n\
         f = false\n",
    );

    assert!(proxy.get_boolean("section", "a").unwrap());
    assert!(!proxy.get_boolean("section", "b").unwrap());
    assert!(proxy.get_boolean("section", "c").unwrap());
    assert!(!proxy.get_boolean("section", "d").unwrap());
    assert!(proxy.get_boolean("section", "e").unwrap());
    assert!(!proxy.get_boolean("section", "f").unwrap());
}

/// Test the type-coercion error for a bad boolean
#[test]
fn test_bad_boolean() {
    let proxy = proxy_from("[section]\nbool_option = 3234\n");

    let error = proxy.get_boolean("section", "bool_option").unwrap_err();

    assert_eq!(1000, error.id());
    assert!(format!("{}", error).contains("bool_option"));
}

/// Test boolean-or-inherit accessor
#[test]
fn test_boolean_or_inherit() {
    let mut proxy = proxy_from("[section]\na = inherit\nb = yes\n");

    assert_eq!(
        OrInherit::Inherit,
        proxy.get_boolean_or_inherit("section", "a").unwrap()
    );
    assert_eq!(
        OrInherit::Value(true),
        proxy.get_boolean_or_inherit("section", "b").unwrap()
    );

    proxy.set_boolean_or_inherit("section", "b", OrInherit::Inherit);
    assert_eq!(
        OrInherit::Inherit,
        proxy.get_boolean_or_inherit("section", "b").unwrap()
    );
}

/// Test defaults mapping supplying values for missing options
#[test]
fn test_defaults_fallback() {
    let mut defaults = HashMap::new();
    defaults.insert("port".to_string(), "8022".to_string());
    let mut proxy =
        FileConfigurationProxy::from_reader(Cursor::new("[server]\n".to_string()), Some(defaults))
            .expect("Failed to read configuration");
    proxy.load().expect("Failed to parse configuration");

    assert_eq!(8022, proxy.get_integer("server", "port").unwrap());

    // An explicit value wins over the default.
    proxy.set_integer("server", "port", 2222);
    assert_eq!(2222, proxy.get_integer("server", "port").unwrap());
}

/// Test creating sections missing from the stored file
#[test]
fn test_create_missing_sections() {
    let mut proxy = proxy_from("[server]\nport = 8022\n");

    proxy.create_missing_sections(&["server", "log"]);

    assert!(proxy.has_section("log"));
    assert_eq!(vec!["server".to_string(), "log".to_string()], proxy.sections());
}

/// Test loading twice consumes the source
#[test]
fn test_load_consumes_source() {
    let mut proxy =
        FileConfigurationProxy::from_reader(Cursor::new("[s]\n".to_string()), None)
            .expect("Failed to read configuration");
    proxy.load().expect("Failed to parse configuration");

    let error = proxy.load().unwrap_err();

    assert_eq!(1002, error.id());
}

/// Test save on a stream-backed proxy is a programming error
#[test]
#[should_panic(expected = "was not loaded from a file")]
fn test_save_without_path_panics() {
    let proxy = proxy_from("[s]\nkey = value\n");
    let _ = proxy.save();
}
