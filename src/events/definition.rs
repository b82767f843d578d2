//! Events catalog
//!
//! Definitions for the events a product can emit, loaded from a commented
//! JSON document with top-level `groups` and `events` mappings. The catalog
//! is validated at load time: every group referenced by an event must be
//! declared.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::common::{CommonsError, Result};
use crate::events::json_file::JsonFile;

#[derive(Debug, Clone, Default, Deserialize)]
struct RawGroup {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawEvent {
    #[serde(default)]
    message: String,
    #[serde(default)]
    groups: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    version_added: String,
    #[serde(default)]
    version_removed: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawCatalog {
    #[serde(default)]
    groups: HashMap<String, RawGroup>,
    #[serde(default)]
    events: HashMap<String, RawEvent>,
}

fn none_when_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Group of related events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGroupDefinition {
    pub name: String,
    pub description: Option<String>,
}

/// Definition for a single event id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDefinition {
    pub id: String,
    pub message: String,
    pub description: Option<String>,
    pub version_added: Option<String>,
    pub version_removed: Option<String>,
    pub groups: Vec<String>,
}

impl EventDefinition {
    /// Event id left-padded with zeros to at least 5 characters.
    pub fn id_padded(&self) -> String {
        format!("{:0>5}", self.id)
    }
}

/// Validated events catalog.
#[derive(Debug, Clone, Default)]
pub struct EventsDefinition {
    groups: HashMap<String, EventGroupDefinition>,
    events: HashMap<String, EventDefinition>,
}

impl EventsDefinition {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_file(JsonFile::from_path(path))
    }

    pub fn from_content(content: &str) -> Result<Self> {
        Self::from_json_file(JsonFile::from_content(content))
    }

    fn from_json_file(mut file: JsonFile) -> Result<Self> {
        file.load()?;
        let display_path = file
            .path()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "in-memory".to_string());
        let raw: RawCatalog = serde_json::from_value(file.data().clone()).map_err(|error| {
            CommonsError::JsonFileFormat {
                path: display_path,
                details: error.to_string(),
            }
        })?;

        let groups: HashMap<String, EventGroupDefinition> = raw
            .groups
            .into_iter()
            .map(|(name, group)| {
                let definition = EventGroupDefinition {
                    name: name.clone(),
                    description: none_when_empty(group.description),
                };
                (name, definition)
            })
            .collect();

        let mut events = HashMap::new();
        for (id, event) in raw.events {
            for group in &event.groups {
                if !groups.contains_key(group) {
                    return Err(CommonsError::UnknownEventGroup {
                        event: id,
                        group: group.clone(),
                    });
                }
            }
            let definition = EventDefinition {
                id: id.clone(),
                message: event.message,
                description: none_when_empty(event.description),
                version_added: none_when_empty(event.version_added),
                version_removed: none_when_empty(event.version_removed),
                groups: event.groups,
            };
            events.insert(id, definition);
        }

        Ok(EventsDefinition { groups, events })
    }

    pub fn event(&self, id: &str) -> Option<&EventDefinition> {
        self.events.get(id)
    }

    pub fn group(&self, name: &str) -> Option<&EventGroupDefinition> {
        self.groups.get(name)
    }

    pub fn all_events(&self) -> &HashMap<String, EventDefinition> {
        &self.events
    }

    pub fn all_groups(&self) -> &HashMap<String, EventGroupDefinition> {
        &self.groups
    }

    /// Events keyed by their zero-padded id.
    pub fn all_events_padded(&self) -> HashMap<String, &EventDefinition> {
        self.events
            .values()
            .map(|event| (event.id_padded(), event))
            .collect()
    }
}
