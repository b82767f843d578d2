//! File-backed configuration proxy
//!
//! Wraps the ordered INI store and exposes fail-fast typed accessors with
//! the reserved sentinel values used across the configuration tree:
//! `none`/`disable`/`disabled` for "unset" and `inherit`/`inherited` for
//! "inherit from parent".

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use crate::common::{CommonsError, Result};
use crate::config::ini::IniStore;

/// Literal stored when an option is explicitly unset.
pub const CONFIGURATION_DISABLED_VALUE: &str = "disabled";

/// Literals decoded as the unset value, lowercase.
pub const CONFIGURATION_DISABLED_VALUES: [&str; 3] = ["none", "disable", "disabled"];

/// Literals decoded as the inherit marker, lowercase. The first entry is
/// the canonical form used for storage.
pub const CONFIGURATION_INHERIT_VALUES: [&str; 2] = ["inherit", "inherited"];

/// Canonical inherit marker.
pub const CONFIGURATION_INHERIT_VALUE: &str = "inherit";

/// A value which is either inherited from the parent or set locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrInherit<T> {
    Inherit,
    Value(T),
}

/// Convert a raw option text into a boolean.
///
/// Accepts `1`/`0` and case-insensitive `yes`/`no`/`true`/`false`.
pub(crate) fn coerce_boolean(input: &str) -> std::result::Result<bool, String> {
    match input {
        "1" => return Ok(true),
        "0" => return Ok(false),
        _ => {}
    }
    match input.to_lowercase().as_str() {
        "yes" | "true" => Ok(true),
        "no" | "false" => Ok(false),
        _ => Err(format!("Not a boolean value: {}", input)),
    }
}

fn is_disabled_value(value: &str) -> bool {
    CONFIGURATION_DISABLED_VALUES.contains(&value.to_lowercase().as_str())
}

fn is_inherit_value(value: &str) -> bool {
    CONFIGURATION_INHERIT_VALUES.contains(&value.to_lowercase().as_str())
}

/// Configuration proxy over a single INI document.
///
/// Created either from a filesystem path or from an in-memory reader. The
/// optional `defaults` mapping supplies fallback raw values for options
/// missing from any section.
#[derive(Debug)]
pub struct FileConfigurationProxy {
    store: IniStore,
    path: Option<PathBuf>,
    pending: Option<String>,
    defaults: HashMap<String, String>,
}

impl FileConfigurationProxy {
    /// Create a proxy backed by a file on disk.
    ///
    /// The file must exist and be readable; the content is parsed on
    /// [`FileConfigurationProxy::load`].
    pub fn from_path(
        path: impl AsRef<Path>,
        defaults: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CommonsError::ConfigurationFileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)
            .map_err(|_| CommonsError::ConfigurationFileUnreadable(path.to_path_buf()))?;
        debug!("Read configuration from {}", path.display());
        Ok(FileConfigurationProxy {
            store: IniStore::new(),
            path: Some(path.to_path_buf()),
            pending: Some(content),
            defaults: defaults.unwrap_or_default(),
        })
    }

    /// Create a proxy backed by an in-memory stream.
    ///
    /// A stream-backed proxy cannot be saved.
    pub fn from_reader(
        mut reader: impl Read,
        defaults: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|error| CommonsError::ConfigurationParse(error.to_string()))?;
        Ok(FileConfigurationProxy {
            store: IniStore::new(),
            path: None,
            pending: Some(content),
            defaults: defaults.unwrap_or_default(),
        })
    }

    /// Parse the configuration source.
    ///
    /// The source is consumed on the first call, successful or not.
    pub fn load(&mut self) -> Result<()> {
        let content = self.pending.take().ok_or_else(|| {
            CommonsError::ConfigurationParse("Configuration source already consumed.".to_string())
        })?;
        self.store.parse(&content)
    }

    /// Store the configuration back into the backing file.
    ///
    /// Writes the full serialization to a temporary file, deletes the
    /// original and renames the temporary file over it, so a crash can not
    /// leave a partially written file behind. Only valid for path-backed
    /// proxies.
    pub fn save(&self) -> Result<()> {
        let path = self.path.as_ref().unwrap_or_else(|| {
            panic!("Trying to save a configuration that was not loaded from a file.")
        });
        let mut tmp_path = path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        fs::write(&tmp_path, self.store.serialize())?;
        // Delete first to work around in-place rename restrictions on
        // platforms where the target may be open.
        if path.exists() {
            fs::remove_file(path)?;
        }
        fs::rename(&tmp_path, path)?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.store.has_section(section)
    }

    pub fn add_section(&mut self, section: &str) {
        self.store.add_section(section);
    }

    pub fn remove_section(&mut self, section: &str) -> bool {
        self.store.remove_section(section)
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.store.has_option(section, option)
    }

    pub fn sections(&self) -> Vec<String> {
        self.store
            .section_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Create any missing sections so that default values become reachable.
    pub fn create_missing_sections(&mut self, sections: &[&str]) {
        for section in sections {
            if !self.store.has_section(section) {
                self.store.add_section(section);
            }
        }
    }

    /// Raw stored value without sentinel decoding, `None` when the option
    /// is not stored in the section itself. Used by transactional setters
    /// to capture and restore previous state.
    pub fn raw_value(&self, section: &str, option: &str) -> Option<String> {
        self.store.get(section, option).map(str::to_string)
    }

    /// Restore a raw value previously captured with
    /// [`FileConfigurationProxy::raw_value`].
    pub fn restore_raw(&mut self, section: &str, option: &str, value: Option<String>) {
        match value {
            Some(value) => self.store.set(section, option, value),
            None => {
                self.store.remove_option(section, option);
            }
        }
    }

    /// Fetch the raw text for an option, falling back to the defaults
    /// mapping.
    ///
    /// A missing section or a missing option with no default is a
    /// programming error: callers must pre-populate defaults or call
    /// [`FileConfigurationProxy::create_missing_sections`] first.
    fn raw(&self, section: &str, option: &str) -> &str {
        if !self.store.has_section(section) {
            panic!(
                "Configuration file does not define section \"{}\" for storing \
                 the option \"{}\". You must create this section.",
                section, option
            );
        }
        match self
            .store
            .get(section, option)
            .or_else(|| self.defaults.get(option).map(String::as_str))
        {
            Some(value) => value,
            None => panic!(
                "Configuration file does not have any option \"{}\" in section \
                 \"{}\". You must add a default value.",
                option, section
            ),
        }
    }

    fn wrong_value(
        &self,
        type_name: &'static str,
        section: &str,
        option: &str,
        details: String,
    ) -> CommonsError {
        CommonsError::WrongOptionValue {
            type_name,
            option: option.to_string(),
            section: section.to_string(),
            details,
        }
    }

    // --- String accessors ---

    /// Stored text with surrounding whitespace stripped and exactly one
    /// layer of matching quotes removed.
    pub fn get_string(&self, section: &str, option: &str) -> Result<String> {
        let value = self.raw(section, option).trim();
        if value.len() >= 2
            && ((value.starts_with('\'') && value.ends_with('\''))
                || (value.starts_with('"') && value.ends_with('"')))
        {
            return Ok(value[1..value.len() - 1].to_string());
        }
        Ok(value.to_string())
    }

    /// String value with the disabled sentinels and the empty string
    /// decoded as `None`.
    pub fn get_string_or_none(&self, section: &str, option: &str) -> Result<Option<String>> {
        let value = self.get_string(section, option)?;
        if value.is_empty() || is_disabled_value(&value) {
            Ok(None)
        } else {
            Ok(Some(value))
        }
    }

    /// String value with the inherit markers normalized to the canonical
    /// token.
    pub fn get_string_or_inherit(&self, section: &str, option: &str) -> Result<String> {
        let value = self.get_string(section, option)?;
        if is_inherit_value(&value) {
            Ok(CONFIGURATION_INHERIT_VALUE.to_string())
        } else {
            Ok(value)
        }
    }

    /// Combined decoding: disabled sentinels to `None`, inherit markers to
    /// the canonical token, anything else unchanged.
    pub fn get_string_special(&self, section: &str, option: &str) -> Result<Option<String>> {
        let value = self.get_string(section, option)?;
        if is_disabled_value(&value) {
            return Ok(None);
        }
        if is_inherit_value(&value) {
            return Ok(Some(CONFIGURATION_INHERIT_VALUE.to_string()));
        }
        Ok(Some(value))
    }

    pub fn set_string(&mut self, section: &str, option: &str, value: &str) {
        self.store.set(section, option, value.to_string());
    }

    pub fn set_string_or_none(&mut self, section: &str, option: &str, value: Option<&str>) {
        let value = value.unwrap_or(CONFIGURATION_DISABLED_VALUE);
        self.store.set(section, option, value.to_string());
    }

    pub fn set_string_or_inherit(&mut self, section: &str, option: &str, value: &str) {
        let value = if is_inherit_value(value) {
            CONFIGURATION_INHERIT_VALUE
        } else {
            value
        };
        self.store.set(section, option, value.to_string());
    }

    pub fn set_string_special(&mut self, section: &str, option: &str, value: Option<&str>) {
        match value {
            None => self.set_string_or_none(section, option, None),
            Some(value) => self.set_string_or_inherit(section, option, value),
        }
    }

    // --- Integer accessors ---

    pub fn get_integer(&self, section: &str, option: &str) -> Result<i64> {
        let value = self.raw(section, option).trim();
        value.parse::<i64>().map_err(|error| {
            self.wrong_value(
                "integer number",
                section,
                option,
                format!("{}. Got: \"{}\"", error, value),
            )
        })
    }

    pub fn get_integer_or_none(&self, section: &str, option: &str) -> Result<Option<i64>> {
        let value = self.get_string(section, option)?;
        if is_disabled_value(&value) {
            Ok(None)
        } else {
            self.get_integer(section, option).map(Some)
        }
    }

    pub fn set_integer(&mut self, section: &str, option: &str, value: i64) {
        self.store.set(section, option, value.to_string());
    }

    pub fn set_integer_or_none(&mut self, section: &str, option: &str, value: Option<i64>) {
        match value {
            None => self
                .store
                .set(section, option, CONFIGURATION_DISABLED_VALUE.to_string()),
            Some(value) => self.set_integer(section, option, value),
        }
    }

    // --- Boolean accessors ---

    pub fn get_boolean(&self, section: &str, option: &str) -> Result<bool> {
        let value = self.raw(section, option).trim();
        coerce_boolean(value)
            .map_err(|details| self.wrong_value("boolean", section, option, details))
    }

    pub fn get_boolean_or_inherit(&self, section: &str, option: &str) -> Result<OrInherit<bool>> {
        let value = self.get_string(section, option)?;
        if is_inherit_value(&value) {
            return Ok(OrInherit::Inherit);
        }
        self.get_boolean(section, option).map(OrInherit::Value)
    }

    pub fn set_boolean(&mut self, section: &str, option: &str, value: bool) {
        self.store.set(section, option, value.to_string());
    }

    pub fn set_boolean_or_inherit(&mut self, section: &str, option: &str, value: OrInherit<bool>) {
        match value {
            OrInherit::Inherit => {
                self.store
                    .set(section, option, CONFIGURATION_INHERIT_VALUE.to_string());
            }
            OrInherit::Value(value) => self.set_boolean(section, option, value),
        }
    }

    // --- Float accessors ---

    pub fn get_float(&self, section: &str, option: &str) -> Result<f64> {
        let value = self.raw(section, option).trim();
        value.parse::<f64>().map_err(|error| {
            self.wrong_value(
                "floating number",
                section,
                option,
                format!("{}. Got: \"{}\"", error, value),
            )
        })
    }

    pub fn set_float(&mut self, section: &str, option: &str, value: f64) {
        self.store.set(section, option, value.to_string());
    }

    // --- JSON accessors ---

    pub fn get_json(&self, section: &str, option: &str) -> Result<Value> {
        let value = self.raw(section, option).trim();
        serde_json::from_str(value).map_err(|error| {
            self.wrong_value("JSON", section, option, format!("{}", error))
        })
    }

    pub fn set_json(&mut self, section: &str, option: &str, value: &Value) {
        self.store.set(section, option, value.to_string());
    }
}
