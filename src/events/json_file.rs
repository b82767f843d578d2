//! Commented-JSON file loader
//!
//! Reads a JSON document in which whole lines starting with `# ` are
//! comments. Inline comments are not supported. An empty document loads as
//! an empty object.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::common::{CommonsError, Result};

/// A file containing JSON serialized data, loaded from disk or from an
/// in-memory string.
#[derive(Debug)]
pub struct JsonFile {
    path: Option<PathBuf>,
    content: Option<String>,
    data: Value,
}

impl JsonFile {
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        JsonFile {
            path: Some(path.as_ref().to_path_buf()),
            content: None,
            data: Value::Object(Map::new()),
        }
    }

    /// In-memory source, mainly for testing and embedded catalogs.
    pub fn from_content(content: &str) -> Self {
        JsonFile {
            path: None,
            content: Some(content.to_string()),
            data: Value::Object(Map::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Deserialized data, an empty object before a successful `load`.
    pub fn data(&self) -> &Value {
        &self.data
    }

    fn display_path(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => "in-memory".to_string(),
        }
    }

    /// Load and deserialize the document.
    pub fn load(&mut self) -> Result<()> {
        let text = match &self.path {
            Some(path) => fs::read_to_string(path).map_err(|error| {
                CommonsError::JsonFileRead {
                    path: self.display_path(),
                    details: error.to_string(),
                }
            })?,
            None => self.content.clone().unwrap_or_default(),
        };

        let stripped: String = text
            .lines()
            .filter(|line| !line.trim_start().starts_with("# "))
            .collect::<Vec<_>>()
            .join("\n");

        if stripped.trim().is_empty() {
            self.data = Value::Object(Map::new());
            return Ok(());
        }

        self.data =
            serde_json::from_str(&stripped).map_err(|error| CommonsError::JsonFileFormat {
                path: self.display_path(),
                details: error.to_string(),
            })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_empty_content() {
        let mut file = JsonFile::from_content("");
        file.load().unwrap();

        assert_eq!(&json!({}), file.data());
    }

    #[test]
    fn test_load_comment_only_content() {
        let mut file = JsonFile::from_content("# first comment\n# second comment\n");
        file.load().unwrap();

        assert_eq!(&json!({}), file.data());
    }

    #[test]
    fn test_load_skips_comment_lines() {
        let content = "# header comment\n{\n# embedded comment\n\"key\": 1\n}\n";
        let mut file = JsonFile::from_content(content);
        file.load().unwrap();

        assert_eq!(&json!({"key": 1}), file.data());
    }

    #[test]
    fn test_load_bad_format() {
        let mut file = JsonFile::from_content("{not json");
        let error = file.load().unwrap_err();

        assert_eq!(1028, error.id());
        assert!(format!("{}", error).contains("Bad format"));
    }

    #[test]
    fn test_load_missing_file() {
        let mut file = JsonFile::from_path("no/such/file.json");
        let error = file.load().unwrap_err();

        assert_eq!(1027, error.id());
        assert!(format!("{}", error).contains("file.json"));
    }
}
