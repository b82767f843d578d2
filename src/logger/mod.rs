//! Product logger
//!
//! All product messages are emitted through [`Logger::log`]; log levels are
//! not used. The logger can be configured from a
//! [`LogConfigurationSection`] and follows its changes: when an option
//! changes, the replacement handler is built first and the previous handler
//! is closed only after the replacement was installed, so a bad value never
//! leaves the logger without its destination.

pub mod entry;
pub mod handlers;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use serde_json::json;

use crate::common::{CommonsError, Result};
use crate::config::log_section::LogConfigurationSection;
use crate::logger::handlers::{
    FileLogHandler, LogHandler, RotationPolicy, StdOutHandler, SyslogHandler,
};
use crate::observer::{Callback, Observer, Signal};

pub use entry::{LogEntry, LOGGER_TIMESTAMP_FORMAT};
pub use handlers::MemoryHandler;

/// Identifier for a handler added to a [`Logger`].
pub type HandlerHandle = u64;

struct HandlerSlot {
    handle: HandlerHandle,
    handler: Box<dyn LogHandler>,
}

const FILE_CHANNELS: &[&str] = &[
    "file",
    "file_rotate_external",
    "file_rotate_count",
    "file_rotate_at_size",
    "file_rotate_each",
];

/// Dispatches log entries to the active handlers.
pub struct Logger {
    slots: RefCell<Vec<HandlerSlot>>,
    next_handle: Cell<HandlerHandle>,
    active: RefCell<HashMap<&'static str, Option<HandlerHandle>>>,
    stdout_handle: Cell<Option<HandlerHandle>>,
    new_handler_added: Cell<bool>,
    section: RefCell<Option<Rc<LogConfigurationSection>>>,
    observer: Observer,
}

impl Logger {
    pub fn new() -> Self {
        Logger {
            slots: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
            active: RefCell::new(HashMap::new()),
            stdout_handle: Cell::new(None),
            new_handler_added: Cell::new(false),
            section: RefCell::new(None),
            observer: Observer::new(),
        }
    }

    /// Whether `configure` completed.
    pub fn configured(&self) -> bool {
        self.section.borrow().is_some()
    }

    /// Subscribe to the logger's own `add-handler` / `remove-handler`
    /// notifications.
    pub fn subscribe(&self, name: &str, callback: Rc<Callback>) {
        self.observer.subscribe(name, callback);
    }

    pub fn unsubscribe(&self, name: Option<&str>, callback: Option<&Rc<Callback>>) {
        self.observer.unsubscribe(name, callback);
    }

    /// Set up the logger from the configuration section.
    ///
    /// Builds the file, syslog and Windows event log handlers and follows
    /// the section's change channels. When any configured handler was
    /// added, the default standard output handler is removed.
    ///
    /// `account` requests building the handlers under another OS account;
    /// running under another account is not available here, so a requested
    /// account is always rejected.
    pub fn configure(
        self: &Rc<Self>,
        section: Rc<LogConfigurationSection>,
        account: Option<&str>,
    ) -> Result<()> {
        assert!(
            !self.configured(),
            "For now, configure can only be called once."
        );

        if let Some(account) = account {
            return Err(CommonsError::LoggerAccountSwitch {
                account: account.to_string(),
                details: "Running under another account is not available.".to_string(),
            });
        }

        *self.section.borrow_mut() = Some(section.clone());
        self.new_handler_added.set(false);

        for channel in FILE_CHANNELS {
            let weak = Rc::downgrade(self);
            section.subscribe(
                channel,
                Rc::new(move |_signal: &Signal| match weak.upgrade() {
                    Some(logger) => logger.reconfigure("file", Logger::add_file),
                    None => Ok(()),
                }),
            );
        }
        let weak = Rc::downgrade(self);
        section.subscribe(
            "syslog",
            Rc::new(move |_signal: &Signal| match weak.upgrade() {
                Some(logger) => logger.reconfigure("syslog", Logger::add_syslog),
                None => Ok(()),
            }),
        );
        let weak = Rc::downgrade(self);
        section.subscribe(
            "windows_eventlog",
            Rc::new(move |_signal: &Signal| match weak.upgrade() {
                Some(logger) => {
                    logger.reconfigure("windows_eventlog", Logger::add_windows_eventlog)
                }
                None => Ok(()),
            }),
        );

        let file = self.add_file()?;
        self.active.borrow_mut().insert("file", file);
        let syslog = self.add_syslog()?;
        self.active.borrow_mut().insert("syslog", syslog);
        let eventlog = self.add_windows_eventlog()?;
        self.active.borrow_mut().insert("windows_eventlog", eventlog);

        if self.new_handler_added.get() {
            self.remove_default_handlers();
        }
        Ok(())
    }

    /// Replace the active handler for `channel`.
    ///
    /// The replacement is built first; the previous handler stays in place
    /// when building fails and is closed only after the replacement was
    /// installed.
    fn reconfigure(
        &self,
        channel: &'static str,
        build: fn(&Logger) -> Result<Option<HandlerHandle>>,
    ) -> Result<()> {
        let previous = self.active.borrow().get(channel).copied().flatten();
        let replacement = build(self)?;
        self.active.borrow_mut().insert(channel, replacement);
        if let Some(handle) = previous {
            self.remove_handler(handle);
        }
        Ok(())
    }

    fn configuration(&self) -> Option<Rc<LogConfigurationSection>> {
        self.section.borrow().clone()
    }

    fn add_file(&self) -> Result<Option<HandlerHandle>> {
        let section = match self.configuration() {
            Some(section) => section,
            None => return Ok(None),
        };
        let path = match section.file()? {
            Some(path) => path,
            None => return Ok(None),
        };

        let count = u32::try_from(section.file_rotate_count()?).unwrap_or(0);
        let at_size = section.file_rotate_at_size()?;
        let each = section.file_rotate_each()?;

        let policy = if section.file_rotate_external()? {
            RotationPolicy::External
        } else if let Some((interval, unit)) = each.filter(|(interval, _)| *interval > 0) {
            RotationPolicy::Timed {
                interval,
                unit,
                count,
            }
        } else if at_size > 0 {
            RotationPolicy::Size {
                at_size: at_size as u64,
                count,
            }
        } else {
            RotationPolicy::None
        };

        let handler = FileLogHandler::open(&path, policy)
            .map_err(|error| CommonsError::LogFileHandler(error.to_string()))?;
        Ok(Some(self.add_handler(Box::new(handler))))
    }

    fn add_syslog(&self) -> Result<Option<HandlerHandle>> {
        let section = match self.configuration() {
            Some(section) => section,
            None => return Ok(None),
        };
        let target = match section.syslog()? {
            Some(target) => target,
            None => return Ok(None),
        };
        let handler = SyslogHandler::open(&target)
            .map_err(|error| CommonsError::SyslogHandler(error.to_string()))?;
        Ok(Some(self.add_handler(Box::new(handler))))
    }

    fn add_windows_eventlog(&self) -> Result<Option<HandlerHandle>> {
        let section = match self.configuration() {
            Some(section) => section,
            None => return Ok(None),
        };
        let source = match section.windows_eventlog()? {
            Some(source) => source,
            None => return Ok(None),
        };
        if cfg!(windows) {
            return Err(CommonsError::WindowsEventLogHandler(format!(
                "No Windows Event binding available for source \"{}\".",
                source
            )));
        }
        // Only meaningful on Windows, matching the configuration being
        // shared across platforms.
        Ok(None)
    }

    /// Add the default standard output handler, used until `configure`
    /// installs the configured destinations.
    pub fn add_default_stdout_handler(&self) {
        let handle = self.add_handler(Box::new(StdOutHandler::new()));
        self.stdout_handle.set(Some(handle));
    }

    fn remove_default_handlers(&self) {
        if let Some(handle) = self.stdout_handle.take() {
            self.remove_handler(handle);
        }
    }

    /// Add `handler` and announce it on the `add-handler` channel.
    pub fn add_handler(&self, handler: Box<dyn LogHandler>) -> HandlerHandle {
        let handle = self.next_handle.get();
        self.next_handle.set(handle + 1);
        let name = handler.name().to_string();
        self.slots.borrow_mut().push(HandlerSlot { handle, handler });
        self.new_handler_added.set(true);
        let signal = Signal::new("logger").with_value("name", json!(name));
        if let Err(error) = self.observer.notify("add-handler", &signal) {
            warn!("add-handler subscriber failed: {}", error);
        }
        handle
    }

    /// Remove and close the handler with `handle`, announcing it on the
    /// `remove-handler` channel.
    pub fn remove_handler(&self, handle: HandlerHandle) -> bool {
        let slot = {
            let mut slots = self.slots.borrow_mut();
            slots
                .iter()
                .position(|slot| slot.handle == handle)
                .map(|index| slots.remove(index))
        };
        match slot {
            Some(mut slot) => {
                slot.handler.close();
                let name = slot.handler.name().to_string();
                let signal = Signal::new("logger").with_value("name", json!(name));
                if let Err(error) = self.observer.notify("remove-handler", &signal) {
                    warn!("remove-handler subscriber failed: {}", error);
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_all_handlers(&self) {
        let handles: Vec<HandlerHandle> = self
            .slots
            .borrow()
            .iter()
            .map(|slot| slot.handle)
            .collect();
        for handle in handles {
            self.remove_handler(handle);
        }
        self.stdout_handle.set(None);
    }

    pub fn handler_names(&self) -> Vec<String> {
        self.slots
            .borrow()
            .iter()
            .map(|slot| slot.handler.name().to_string())
            .collect()
    }

    /// Emit an entry through every active handler.
    ///
    /// A failing handler is reported through the diagnostics log and does
    /// not stop dispatch to the remaining handlers.
    pub fn log(&self, entry: LogEntry) {
        let mut slots = self.slots.borrow_mut();
        for slot in slots.iter_mut() {
            if let Err(error) = slot.handler.emit(&entry) {
                warn!("Log handler \"{}\" failed: {}", slot.handler.name(), error);
            }
        }
    }

    /// Log a plain debug message under the generic entry id 100.
    pub fn debug(&self, message: &str) {
        self.log(LogEntry::simple("100", message));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_reaches_all_handlers() {
        let logger = Logger::new();
        let first = MemoryHandler::new();
        let first_buffer = first.buffer();
        let second = MemoryHandler::new();
        let second_buffer = second.buffer();
        logger.add_handler(Box::new(first));
        logger.add_handler(Box::new(second));

        logger.log(LogEntry::simple("100", "broadcast"));

        assert_eq!(1, first_buffer.borrow().len());
        assert_eq!(1, second_buffer.borrow().len());
    }

    #[test]
    fn test_debug_uses_generic_id() {
        let logger = Logger::new();
        let handler = MemoryHandler::new();
        let buffer = handler.buffer();
        logger.add_handler(Box::new(handler));

        logger.debug("some debug text");

        assert_eq!("100", buffer.borrow()[0].message_id);
        assert_eq!("some debug text", buffer.borrow()[0].text);
    }

    #[test]
    fn test_add_remove_handler_notifications() {
        let logger = Logger::new();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let added = seen.clone();
        logger.subscribe(
            "add-handler",
            Rc::new(move |signal: &Signal| {
                let name = signal.value("name").and_then(|value| value.as_str());
                added.borrow_mut().push(format!("add {}", name.unwrap_or("?")));
                Ok(())
            }),
        );
        let removed = seen.clone();
        logger.subscribe(
            "remove-handler",
            Rc::new(move |signal: &Signal| {
                let name = signal.value("name").and_then(|value| value.as_str());
                removed
                    .borrow_mut()
                    .push(format!("remove {}", name.unwrap_or("?")));
                Ok(())
            }),
        );

        let handle = logger.add_handler(Box::new(MemoryHandler::new()));
        assert!(logger.remove_handler(handle));
        assert!(!logger.remove_handler(handle));

        assert_eq!(vec!["add Memory".to_string(), "remove Memory".to_string()], *seen.borrow());
    }

    #[test]
    fn test_remove_all_handlers() {
        let logger = Logger::new();
        logger.add_default_stdout_handler();
        logger.add_handler(Box::new(MemoryHandler::new()));
        assert_eq!(2, logger.handler_names().len());

        logger.remove_all_handlers();

        assert!(logger.handler_names().is_empty());
    }
}
