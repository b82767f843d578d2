//! Events handler
//!
//! Routes emitted events through the catalog and the enabled-groups filter
//! to the logger. Emitting an event must never abort the emitting code
//! path: unknown ids and interpolation failures are downgraded to internal
//! diagnostic log entries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::rc::Rc;

use log::warn;

use crate::config::log_section::{
    LogConfigurationSection, CONFIGURATION_ALL_LOG_ENABLED_GROUPS,
};
use crate::events::definition::EventsDefinition;
use crate::logger::{LogEntry, Logger};

/// Internal diagnostic id for an unknown event id.
const EVENT_UNKNOWN_ID: &str = "1024";
/// Internal diagnostic id for a failed message interpolation.
const EVENT_BAD_INTERPOLATION: &str = "1025";

struct HandlerConfiguration {
    definitions: EventsDefinition,
    log_section: Rc<LogConfigurationSection>,
}

/// Emission-time fields accompanying an event.
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    pub data: Option<HashMap<String, String>>,
    pub peer: Option<SocketAddr>,
    pub avatar: Option<String>,
}

impl EventContext {
    pub fn with_data(mut self, data: HashMap<String, String>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    pub fn with_avatar(mut self, avatar: &str) -> Self {
        self.avatar = Some(avatar.to_string());
        self
    }
}

/// Interpolate `%(name)s` placeholders from `data`.
///
/// Returns the name of the first missing key on failure.
fn interpolate(
    template: &str,
    data: &HashMap<String, String>,
) -> std::result::Result<String, String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("%(") {
        output.push_str(&rest[..start]);
        let after_marker = &rest[start + 2..];
        match after_marker.find(")s") {
            Some(end) => {
                let name = &after_marker[..end];
                match data.get(name) {
                    Some(value) => output.push_str(value),
                    None => return Err(name.to_string()),
                }
                rest = &after_marker[end + 2..];
            }
            None => {
                // Unterminated placeholder, keep it verbatim.
                output.push_str(&rest[start..]);
                return Ok(output);
            }
        }
    }
    output.push_str(rest);
    Ok(output)
}

/// Service routing events to the logger.
///
/// Constructed explicitly and configured once; tests construct fresh
/// instances instead of sharing process-wide state.
pub struct EventsHandler {
    logger: Rc<Logger>,
    configuration: RefCell<Option<HandlerConfiguration>>,
}

impl EventsHandler {
    pub fn new(logger: Rc<Logger>) -> Self {
        EventsHandler {
            logger,
            configuration: RefCell::new(None),
        }
    }

    pub fn logger(&self) -> &Rc<Logger> {
        &self.logger
    }

    /// Attach the catalog and the log section used for filtering.
    ///
    /// Configuring twice is a programming error.
    pub fn configure(
        &self,
        definitions: EventsDefinition,
        log_section: Rc<LogConfigurationSection>,
    ) {
        let mut configuration = self.configuration.borrow_mut();
        assert!(
            configuration.is_none(),
            "Events handler is already configured."
        );
        *configuration = Some(HandlerConfiguration {
            definitions,
            log_section,
        });
    }

    pub fn remove_configuration(&self) {
        *self.configuration.borrow_mut() = None;
    }

    pub fn configured(&self) -> bool {
        self.configuration.borrow().is_some()
    }

    /// Emit the event with `id`.
    ///
    /// An explicit `message` is used verbatim; otherwise the catalog
    /// template is interpolated against the context data. Never fails:
    /// unknown ids and interpolation problems are logged as diagnostics.
    pub fn emit(&self, id: &str, message: Option<&str>, context: EventContext) {
        let configuration = self.configuration.borrow();
        let configuration = match configuration.as_ref() {
            Some(configuration) => configuration,
            None => {
                self.dispatch(id, message.unwrap_or(""), &context);
                return;
            }
        };

        let definition = match configuration.definitions.event(id) {
            Some(definition) => definition.clone(),
            None => {
                self.logger.log(LogEntry::simple(
                    EVENT_UNKNOWN_ID,
                    &format!("Unknown event with id \"{}\".", id),
                ));
                return;
            }
        };

        let enabled_groups = match configuration.log_section.enabled_groups() {
            Ok(groups) => groups,
            Err(error) => {
                warn!("Could not read enabled log groups: {}", error);
                vec![CONFIGURATION_ALL_LOG_ENABLED_GROUPS.to_string()]
            }
        };
        let all_enabled = enabled_groups
            .iter()
            .any(|group| group == CONFIGURATION_ALL_LOG_ENABLED_GROUPS);
        if !all_enabled
            && !definition
                .groups
                .iter()
                .any(|group| enabled_groups.contains(group))
        {
            return;
        }

        let text = match message {
            Some(message) => message.to_string(),
            None => match &context.data {
                Some(data) => match interpolate(&definition.message, data) {
                    Ok(text) => text,
                    Err(missing) => {
                        self.logger.log(LogEntry::simple(
                            EVENT_BAD_INTERPOLATION,
                            &format!(
                                "Failed to format event with id \"{}\". \
                                 No data for \"{}\".",
                                id, missing
                            ),
                        ));
                        definition.message.clone()
                    }
                },
                None => definition.message.clone(),
            },
        };

        self.dispatch(id, &text, &context);
    }

    /// Integer id convenience, the id is coerced to its decimal string.
    pub fn emit_id(&self, id: u32, message: Option<&str>, context: EventContext) {
        self.emit(&id.to_string(), message, context);
    }

    fn dispatch(&self, id: &str, text: &str, context: &EventContext) {
        self.logger.log(LogEntry::new(
            id,
            text,
            context.avatar.clone(),
            context.peer,
            context.data.clone(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_replaces_placeholders() {
        let mut data = HashMap::new();
        data.insert("account".to_string(), "john".to_string());
        data.insert("path".to_string(), "/srv/file".to_string());

        let text =
            interpolate("Upload of %(path)s by %(account)s.", &data).unwrap();

        assert_eq!("Upload of /srv/file by john.", text);
    }

    #[test]
    fn test_interpolate_missing_key() {
        let data = HashMap::new();

        let missing = interpolate("Got %(account)s.", &data).unwrap_err();

        assert_eq!("account", missing);
    }

    #[test]
    fn test_interpolate_unterminated_placeholder() {
        let mut data = HashMap::new();
        data.insert("a".to_string(), "1".to_string());

        let text = interpolate("%(a)s and %(broken", &data).unwrap();

        assert_eq!("1 and %(broken", text);
    }

    #[test]
    fn test_interpolate_plain_text() {
        let data = HashMap::new();

        assert_eq!(
            "no placeholders",
            interpolate("no placeholders", &data).unwrap()
        );
    }
}
