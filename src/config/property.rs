//! Property protocol
//!
//! Uniform path-addressed CRUD over a tree of configuration sections,
//! independent of how each section stores its attributes. Each section type
//! declares its public surface through a static capability schema; only
//! declared names are visible through the protocol, and a declared name
//! which is not actually implemented is an error rather than silently
//! skipped.

use std::rc::Rc;

use serde_json::{Map, Value};

use crate::common::{CommonsError, Result};

/// How a declared name is exposed through the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Public, readable only.
    ReadOnly,
    /// Public, readable and writable.
    ReadWrite,
    /// Public child section, not directly writable.
    Section,
}

/// One entry of a section's capability schema.
#[derive(Debug, Clone, Copy)]
pub struct PropertyDeclaration {
    pub name: &'static str,
    pub kind: PropertyKind,
}

impl PropertyDeclaration {
    pub const fn new(name: &'static str, kind: PropertyKind) -> Self {
        PropertyDeclaration { name, kind }
    }
}

/// Split a property path into head and tail.
///
/// `None` and the empty string normalize to `(None, None)`; a path without
/// a separator has no tail; a trailing separator yields a `None` tail.
pub fn traverse_path(path: Option<&str>) -> (Option<&str>, Option<&str>) {
    let path = match path {
        Some(path) if !path.is_empty() => path,
        _ => return (None, None),
    };
    let (head, tail) = match path.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    };
    let head = if head.is_empty() { None } else { Some(head) };
    let tail = match tail {
        Some("") | None => None,
        Some(tail) => Some(tail),
    };
    (head, tail)
}

/// A node of the configuration tree exposing properties.
///
/// Implementors provide the capability schema and raw attribute/section
/// access; the traversal algorithms are shared provided methods.
pub trait PropertySection {
    /// Static capability schema for this section type.
    fn declarations(&self) -> &'static [PropertyDeclaration];

    /// Value of the public attribute `name`.
    ///
    /// Must fail with `NoSuchAttribute` when a declared name is not backed
    /// by a real attribute.
    fn read_attribute(&self, name: &str) -> Result<Value>;

    /// Store a new value for the writable attribute `name`.
    fn write_attribute(&self, name: &str, value: &Value) -> Result<()>;

    /// Child section with `name`, if implemented.
    fn child_section(&self, name: &str) -> Option<Rc<dyn PropertySection>>;

    /// Names declared readable (read-only or read-write).
    fn public_attribute_names(&self) -> Vec<&'static str> {
        self.declarations()
            .iter()
            .filter(|declaration| {
                matches!(
                    declaration.kind,
                    PropertyKind::ReadOnly | PropertyKind::ReadWrite
                )
            })
            .map(|declaration| declaration.name)
            .collect()
    }

    /// Names declared writable.
    fn writable_attribute_names(&self) -> Vec<&'static str> {
        self.declarations()
            .iter()
            .filter(|declaration| declaration.kind == PropertyKind::ReadWrite)
            .map(|declaration| declaration.name)
            .collect()
    }

    /// Names declared as child sections.
    fn section_names(&self) -> Vec<&'static str> {
        self.declarations()
            .iter()
            .filter(|declaration| declaration.kind == PropertyKind::Section)
            .map(|declaration| declaration.name)
            .collect()
    }

    /// Resolve the declared child section `name` or fail with
    /// `NoSuchSection`.
    fn get_section(&self, name: &str) -> Result<Rc<dyn PropertySection>> {
        self.child_section(name)
            .ok_or_else(|| CommonsError::NoSuchSection(name.to_string()))
    }

    /// Read a property.
    ///
    /// With no path, returns the mapping of every public attribute and the
    /// recursively expanded mapping of every child section. A path head
    /// matching an attribute returns that value directly; a head matching a
    /// section recurses with the tail. An unmatched head falls through to
    /// the full mapping.
    fn get_property(&self, path: Option<&str>) -> Result<Value> {
        let (head, tail) = traverse_path(path);

        let mut result = Map::new();

        for name in self.public_attribute_names() {
            let value = self.read_attribute(name)?;
            if head == Some(name) {
                return Ok(value);
            }
            result.insert(name.to_string(), value);
        }

        for name in self.section_names() {
            let section = self.get_section(name)?;
            let section_properties = section.get_property(tail)?;
            if head == Some(name) {
                return Ok(section_properties);
            }
            result.insert(name.to_string(), section_properties);
        }

        Ok(Value::Object(result))
    }

    /// Write a property addressed by `path`.
    ///
    /// Only read-write leaves can be set; a head which is a section (when
    /// the path ends there) or undeclared fails with `NoSuchAttribute`.
    /// Whether the name exists read-only or not at all is deliberately not
    /// distinguished.
    fn set_property(&self, path: &str, value: &Value) -> Result<()> {
        let (head, tail) = traverse_path(Some(path));

        match tail {
            None => {
                for name in self.writable_attribute_names() {
                    if head == Some(name) {
                        return self.write_attribute(name, value);
                    }
                }
                Err(CommonsError::NoSuchAttribute(
                    head.unwrap_or_default().to_string(),
                ))
            }
            Some(tail) => {
                for name in self.section_names() {
                    if head == Some(name) {
                        let section = self.get_section(name)?;
                        return section.set_property(tail, value);
                    }
                }
                Err(CommonsError::NoSuchSection(
                    head.unwrap_or_default().to_string(),
                ))
            }
        }
    }

    /// Create a property under a child section.
    ///
    /// Only sections support create; descending always goes through a
    /// declared section and a `None` path fails with `CreateNotSupported`.
    fn create_property(&self, path: Option<&str>, value: &Value) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => return Err(CommonsError::CreateNotSupported),
        };
        let (head, tail) = traverse_path(Some(path));

        for name in self.section_names() {
            if head == Some(name) {
                let section = self.get_section(name)?;
                return section.create_property(tail, value);
            }
        }

        Err(CommonsError::NoSuchSection(
            head.unwrap_or_default().to_string(),
        ))
    }

    /// Delete a property under a child section.
    ///
    /// Mirror of [`PropertySection::create_property`].
    fn delete_property(&self, path: Option<&str>) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => return Err(CommonsError::DeleteNotSupported),
        };
        let (head, tail) = traverse_path(Some(path));

        for name in self.section_names() {
            if head == Some(name) {
                let section = self.get_section(name)?;
                return section.delete_property(tail);
            }
        }

        Err(CommonsError::NoSuchSection(
            head.unwrap_or_default().to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traverse_path_empty() {
        assert_eq!((None, None), traverse_path(None));
        assert_eq!((None, None), traverse_path(Some("")));
    }

    #[test]
    fn test_traverse_path_no_separator() {
        assert_eq!((Some("a"), None), traverse_path(Some("a")));
    }

    #[test]
    fn test_traverse_path_head_and_tail() {
        assert_eq!((Some("a"), Some("b")), traverse_path(Some("a/b")));
        assert_eq!((Some("a"), Some("b/c")), traverse_path(Some("a/b/c")));
    }

    #[test]
    fn test_traverse_path_trailing_separator() {
        assert_eq!((Some("a"), None), traverse_path(Some("a/")));
    }

    #[test]
    fn test_traverse_path_leading_separator() {
        assert_eq!((None, Some("a")), traverse_path(Some("/a")));
    }
}
