//! Property protocol tests
//!
//! Tests for path-addressed reads and writes over a small configuration
//! tree with a typed log section leaf.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use serde_json::{json, Value};

use server_commons::common::{CommonsError, Result};
use server_commons::config::{
    FileConfigurationProxy, LogConfigurationSection, PropertyDeclaration, PropertyKind,
    PropertySection,
};
use server_commons::observer::Signal;

const ROOT_DECLARATIONS: &[PropertyDeclaration] = &[
    PropertyDeclaration::new("name", PropertyKind::ReadOnly),
    PropertyDeclaration::new("banner", PropertyKind::ReadWrite),
    PropertyDeclaration::new("log", PropertyKind::Section),
];

/// Root of the test configuration tree: two attributes and the log
/// section as a child.
struct RootSection {
    banner: RefCell<Value>,
    log: Rc<LogConfigurationSection>,
}

impl PropertySection for RootSection {
    fn declarations(&self) -> &'static [PropertyDeclaration] {
        ROOT_DECLARATIONS
    }

    fn read_attribute(&self, name: &str) -> Result<Value> {
        match name {
            "name" => Ok(json!("root")),
            "banner" => Ok(self.banner.borrow().clone()),
            _ => Err(CommonsError::NoSuchAttribute(name.to_string())),
        }
    }

    fn write_attribute(&self, name: &str, value: &Value) -> Result<()> {
        match name {
            "banner" => {
                *self.banner.borrow_mut() = value.clone();
                Ok(())
            }
            _ => Err(CommonsError::NoSuchAttribute(name.to_string())),
        }
    }

    fn child_section(&self, name: &str) -> Option<Rc<dyn PropertySection>> {
        match name {
            "log" => Some(self.log.clone()),
            _ => None,
        }
    }
}

/// A section whose declared attribute is not backed by anything.
struct HollowSection;

const HOLLOW_DECLARATIONS: &[PropertyDeclaration] =
    &[PropertyDeclaration::new("ghost", PropertyKind::ReadOnly)];

impl PropertySection for HollowSection {
    fn declarations(&self) -> &'static [PropertyDeclaration] {
        HOLLOW_DECLARATIONS
    }

    fn read_attribute(&self, name: &str) -> Result<Value> {
        Err(CommonsError::NoSuchAttribute(name.to_string()))
    }

    fn write_attribute(&self, name: &str, _value: &Value) -> Result<()> {
        Err(CommonsError::NoSuchAttribute(name.to_string()))
    }

    fn child_section(&self, _name: &str) -> Option<Rc<dyn PropertySection>> {
        None
    }
}

fn log_section() -> Rc<LogConfigurationSection> {
    let mut proxy = FileConfigurationProxy::from_reader(
        Cursor::new("[log]\nlog_enabled = yes\n".to_string()),
        Some(LogConfigurationSection::defaults()),
    )
    .expect("Failed to read configuration");
    proxy.load().expect("Failed to parse configuration");
    Rc::new(LogConfigurationSection::new(Rc::new(RefCell::new(proxy))))
}

fn root() -> RootSection {
    RootSection {
        banner: RefCell::new(json!("hello")),
        log: log_section(),
    }
}

/// Test that the full mapping contains exactly the declared names
#[test]
fn test_visibility_invariant() {
    let root = root();

    let properties = root.get_property(None).unwrap();

    let object = properties.as_object().unwrap();
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(vec!["banner", "log", "name"], keys);

    // The child section is recursively expanded with its own declared set.
    let log = object["log"].as_object().unwrap();
    assert_eq!(9, log.len());
    assert_eq!(json!(true), log["enabled"]);
    assert_eq!(json!(["all"]), log["enabled_groups"]);
}

/// Test direct attribute reads
#[test]
fn test_get_leaf() {
    let root = root();

    assert_eq!(json!("hello"), root.get_property(Some("banner")).unwrap());
    assert_eq!(json!("root"), root.get_property(Some("name")).unwrap());
}

/// Test reads through a section branch
#[test]
fn test_get_through_section() {
    let root = root();

    assert_eq!(json!(true), root.get_property(Some("log/enabled")).unwrap());

    let branch = root.get_property(Some("log")).unwrap();
    assert!(branch.as_object().unwrap().contains_key("file_rotate_each"));
}

/// Test that an unmatched head falls through to the full mapping
#[test]
fn test_get_unknown_head_returns_mapping() {
    let root = root();

    let properties = root.get_property(Some("nonexistent")).unwrap();

    assert!(properties.as_object().unwrap().contains_key("banner"));
}

/// Test that a declared name without a backing attribute is an error
#[test]
fn test_declared_but_missing_attribute() {
    let section = HollowSection;

    let error = section.get_property(None).unwrap_err();

    assert_eq!(1032, error.id());
    assert!(format!("{}", error).contains("ghost"));
}

/// Test writing a read-write leaf
#[test]
fn test_set_leaf() {
    let root = root();

    root.set_property("banner", &json!("welcome")).unwrap();

    assert_eq!(json!("welcome"), root.get_property(Some("banner")).unwrap());
}

/// Test writes on read-only and undeclared names
#[test]
fn test_set_not_writable() {
    let root = root();

    // Read-only and missing attributes fail the same way.
    let error = root.set_property("name", &json!("other")).unwrap_err();
    assert_eq!(1032, error.id());

    let error = root.set_property("nonexistent", &json!(1)).unwrap_err();
    assert_eq!(1032, error.id());
}

/// Test writing through a section path
#[test]
fn test_set_through_section() {
    let root = root();

    root.set_property("log/enabled", &json!(false)).unwrap();

    assert!(!root.log.enabled().unwrap());
    assert_eq!(json!(false), root.get_property(Some("log/enabled")).unwrap());
}

/// Test a write with an uncoercible value
#[test]
fn test_set_bad_value_type() {
    let root = root();

    let error = root
        .set_property("log/file_rotate_at_size", &json!("not a number"))
        .unwrap_err();

    assert_eq!(1001, error.id());
}

/// Test writing through an unknown section head
#[test]
fn test_set_unknown_section() {
    let root = root();

    let error = root.set_property("ghost/enabled", &json!(1)).unwrap_err();

    assert_eq!(1033, error.id());
}

/// Test create and delete traversal rules
#[test]
fn test_create_and_delete_traversal() {
    let root = root();

    // Without a path neither operation is supported.
    assert_eq!(1034, root.create_property(None, &json!(1)).unwrap_err().id());
    assert_eq!(1035, root.delete_property(None).unwrap_err().id());

    // Attribute heads are not sections.
    assert_eq!(
        1033,
        root.create_property(Some("banner/x"), &json!(1))
            .unwrap_err()
            .id()
    );

    // Descending into a section ends on a node which does not support
    // create either.
    assert_eq!(
        1034,
        root.create_property(Some("log"), &json!(1)).unwrap_err().id()
    );
    assert_eq!(1035, root.delete_property(Some("log")).unwrap_err().id());
}

/// Test that a failed change subscriber reverts the stored value
#[test]
fn test_revert_on_failed_notify() {
    let root = root();
    root.log.subscribe(
        "enabled",
        Rc::new(|_signal: &Signal| Err(CommonsError::DeleteNotSupported)),
    );

    let error = root.set_property("log/enabled", &json!(false)).unwrap_err();

    assert_eq!(1035, error.id());
    // The write was rolled back before the error propagated.
    assert!(root.log.enabled().unwrap());
}
