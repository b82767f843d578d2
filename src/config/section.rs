//! Section/proxy binding
//!
//! Couples a configuration section to its proxy, section name and option
//! prefix, and supplies the `enabled` flag every section carries together
//! with transactional change notification: a subscriber failure reverts
//! the stored value before the error propagates.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::json;

use crate::common::Result;
use crate::config::proxy::FileConfigurationProxy;
use crate::observer::{Callback, Observer, Signal};

/// Shared state embedded by every concrete configuration section.
pub struct SectionBinding {
    proxy: Rc<RefCell<FileConfigurationProxy>>,
    section_name: String,
    prefix: String,
    observer: Observer,
}

impl SectionBinding {
    pub fn new(
        proxy: Rc<RefCell<FileConfigurationProxy>>,
        section_name: &str,
        prefix: &str,
    ) -> Self {
        SectionBinding {
            proxy,
            section_name: section_name.to_string(),
            prefix: prefix.to_string(),
            observer: Observer::new(),
        }
    }

    pub fn proxy(&self) -> &Rc<RefCell<FileConfigurationProxy>> {
        &self.proxy
    }

    pub fn section_name(&self) -> &str {
        &self.section_name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Full option name for `option` under this section's prefix.
    pub fn option_key(&self, option: &str) -> String {
        format!("{}_{}", self.prefix, option)
    }

    pub fn subscribe(&self, name: &str, callback: Rc<Callback>) {
        self.observer.subscribe(name, callback);
    }

    pub fn unsubscribe(&self, name: Option<&str>, callback: Option<&Rc<Callback>>) {
        self.observer.unsubscribe(name, callback);
    }

    pub fn notify(&self, name: &str, signal: &Signal) -> Result<()> {
        self.observer.notify(name, signal)
    }

    /// Whether this section's service is enabled.
    pub fn enabled(&self) -> Result<bool> {
        self.proxy
            .borrow()
            .get_boolean(&self.section_name, &self.option_key("enabled"))
    }

    /// Set the enabled flag and notify subscribers of the `enabled`
    /// channel, reverting the write if a subscriber fails.
    pub fn set_enabled(&self, value: bool) -> Result<()> {
        let initial = self.enabled()?;
        let signal = Signal::change(&self.section_name, json!(initial), json!(value));
        self.update_and_notify("enabled", signal, |proxy, key| {
            proxy.set_boolean(&self.section_name, key, value);
            Ok(())
        })
    }

    /// Apply `write` to the option under this section, then notify the
    /// channel named after `option`.
    ///
    /// The raw stored value is captured first; if a notification
    /// subscriber fails, the raw value is restored before the error is
    /// returned, so observers always see either the complete change or
    /// none of it.
    pub fn update_and_notify(
        &self,
        option: &str,
        signal: Signal,
        write: impl FnOnce(&mut FileConfigurationProxy, &str) -> Result<()>,
    ) -> Result<()> {
        let key = self.option_key(option);
        let initial_raw = self.proxy.borrow().raw_value(&self.section_name, &key);
        write(&mut self.proxy.borrow_mut(), &key)?;
        if let Err(error) = self.observer.notify(option, &signal) {
            self.proxy
                .borrow_mut()
                .restore_raw(&self.section_name, &key, initial_raw);
            return Err(error);
        }
        Ok(())
    }
}
