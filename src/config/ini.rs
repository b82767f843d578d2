//! Ordered INI storage
//!
//! In-memory representation of an INI document which preserves section and
//! option order so that a load/save cycle keeps the file layout stable.
//!
//! The dialect is deliberately small: `[name]` section headers, `key = value`
//! or `key: value` options, `#`/`;` comment lines, and continuation lines
//! marked by leading whitespace. On serialization embedded newlines are
//! re-indented with a leading tab so multi-line values survive a round trip.

use crate::common::{CommonsError, Result};

#[derive(Debug, Clone, Default)]
struct IniSection {
    name: String,
    options: Vec<(String, String)>,
}

impl IniSection {
    fn get(&self, option: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(name, _)| name == option)
            .map(|(_, value)| value.as_str())
    }

    fn set(&mut self, option: &str, value: String) {
        match self.options.iter_mut().find(|(name, _)| name == option) {
            Some((_, existing)) => *existing = value,
            None => self.options.push((option.to_string(), value)),
        }
    }

    fn remove(&mut self, option: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|(name, _)| name != option);
        self.options.len() != before
    }
}

/// Ordered mapping of section name to ordered option/value pairs.
#[derive(Debug, Clone, Default)]
pub struct IniStore {
    sections: Vec<IniSection>,
}

impl IniStore {
    pub fn new() -> Self {
        IniStore::default()
    }

    /// Parse `text` into this store.
    ///
    /// Fails with a `ConfigurationParse` error on malformed section headers,
    /// option lines without a delimiter, continuation lines before any
    /// option, and duplicate section headers.
    pub fn parse(&mut self, text: &str) -> Result<()> {
        let mut current_section: Option<usize> = None;
        let mut current_option: Option<String> = None;

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim_end_matches('\r');

            if line.trim().is_empty() {
                current_option = None;
                continue;
            }

            // Continuation lines are only recognized inside an option.
            if line.starts_with(' ') || line.starts_with('\t') {
                let continuation = line.trim();
                match (current_section, &current_option) {
                    (Some(section), Some(option)) => {
                        let section = &mut self.sections[section];
                        let value = section
                            .get(option)
                            .map(|value| format!("{}\n{}", value, continuation))
                            .unwrap_or_else(|| continuation.to_string());
                        section.set(option, value);
                        continue;
                    }
                    _ => {
                        return Err(CommonsError::ConfigurationParse(format!(
                            "Unexpected continuation at line {}: \"{}\"",
                            line_number, continuation
                        )));
                    }
                }
            }

            let line = line.trim();

            if line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let name = match header.strip_suffix(']') {
                    Some(name) if !name.trim().is_empty() => name.trim(),
                    _ => {
                        return Err(CommonsError::ConfigurationParse(format!(
                            "Invalid section header at line {}: \"{}\"",
                            line_number, line
                        )));
                    }
                };
                if self.has_section(name) {
                    return Err(CommonsError::ConfigurationParse(format!(
                        "Duplicate section \"{}\" at line {}.",
                        name, line_number
                    )));
                }
                self.sections.push(IniSection {
                    name: name.to_string(),
                    options: Vec::new(),
                });
                current_section = Some(self.sections.len() - 1);
                current_option = None;
                continue;
            }

            let section = match current_section {
                Some(section) => section,
                None => {
                    return Err(CommonsError::ConfigurationParse(format!(
                        "Option without a section header at line {}: \"{}\"",
                        line_number, line
                    )));
                }
            };

            let delimiter = line
                .char_indices()
                .find(|(_, character)| *character == '=' || *character == ':')
                .map(|(position, _)| position);
            match delimiter {
                Some(position) => {
                    let option = line[..position].trim();
                    let value = line[position + 1..].trim();
                    if option.is_empty() {
                        return Err(CommonsError::ConfigurationParse(format!(
                            "Option with empty name at line {}: \"{}\"",
                            line_number, line
                        )));
                    }
                    self.sections[section].set(option, value.to_string());
                    current_option = Some(option.to_string());
                }
                None => {
                    return Err(CommonsError::ConfigurationParse(format!(
                        "Option without a delimiter at line {}: \"{}\"",
                        line_number, line
                    )));
                }
            }
        }

        Ok(())
    }

    /// Serialize the store back into INI text.
    ///
    /// Multi-line values are continued with a leading tab so that `parse`
    /// reads them back unchanged.
    pub fn serialize(&self) -> String {
        let mut output = String::new();
        for section in &self.sections {
            output.push_str(&format!("[{}]\n", section.name));
            for (option, value) in &section.options {
                output.push_str(&format!("{} = {}\n", option, value.replace('\n', "\n\t")));
            }
            output.push('\n');
        }
        output
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.sections.iter().any(|section| section.name == name)
    }

    /// Add a new empty section.
    ///
    /// Section names must be unique; adding a duplicate is a programming
    /// error.
    pub fn add_section(&mut self, name: &str) {
        assert!(
            !self.has_section(name),
            "Section \"{}\" already exists.",
            name
        );
        self.sections.push(IniSection {
            name: name.to_string(),
            options: Vec::new(),
        });
    }

    pub fn remove_section(&mut self, name: &str) -> bool {
        let before = self.sections.len();
        self.sections.retain(|section| section.name != name);
        self.sections.len() != before
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.section(section)
            .map(|section| section.get(option).is_some())
            .unwrap_or(false)
    }

    pub fn section_names(&self) -> Vec<&str> {
        self.sections
            .iter()
            .map(|section| section.name.as_str())
            .collect()
    }

    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        self.section(section).and_then(|section| section.get(option))
    }

    /// Store a raw value.
    ///
    /// The target section must exist; callers are expected to create
    /// sections up front.
    pub fn set(&mut self, section: &str, option: &str, value: String) {
        let section = self
            .section_mut(section)
            .unwrap_or_else(|| panic!("Section \"{}\" does not exist.", section));
        section.set(option, value);
    }

    pub fn remove_option(&mut self, section: &str, option: &str) -> bool {
        self.section_mut(section)
            .map(|section| section.remove(option))
            .unwrap_or(false)
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|section| section.name == name)
    }

    fn section_mut(&mut self, name: &str) -> Option<&mut IniSection> {
        self.sections.iter_mut().find(|section| section.name == name)
    }
}
