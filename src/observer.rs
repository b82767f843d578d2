//! Observer module
//!
//! Minimal publish/subscribe mechanism used for change notification across
//! the configuration tree. There is no persistence and no ordering guarantee
//! beyond subscription order.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::common::Result;

/// Callback invoked when a signal is emitted.
///
/// A failing callback propagates its error to the caller of
/// [`Observer::notify`]; failures are never swallowed.
pub type Callback = dyn Fn(&Signal) -> Result<()>;

/// A signal triggered through the observer.
///
/// It bundles the name of the emitting source together with the named values
/// provided by the triggering call.
#[derive(Debug, Clone)]
pub struct Signal {
    /// Name of the emitting object, usually a section name.
    pub source: String,
    values: HashMap<String, Value>,
}

impl Signal {
    pub fn new(source: &str) -> Self {
        Signal {
            source: source.to_string(),
            values: HashMap::new(),
        }
    }

    /// Build a change signal carrying `initial_value` and `current_value`.
    pub fn change(source: &str, initial_value: Value, current_value: Value) -> Self {
        Signal::new(source)
            .with_value("initial_value", initial_value)
            .with_value("current_value", current_value)
    }

    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn initial_value(&self) -> Option<&Value> {
        self.value("initial_value")
    }

    pub fn current_value(&self) -> Option<&Value> {
        self.value("current_value")
    }
}

/// Subscription registry with fan-out notification.
///
/// Callbacks are identified by `Rc` pointer identity: subscribing the same
/// `Rc` to the same name twice is a no-op after the first call.
#[derive(Default)]
pub struct Observer {
    subscribers: RefCell<HashMap<String, Vec<Rc<Callback>>>>,
}

impl Observer {
    pub fn new() -> Self {
        Observer::default()
    }

    /// Subscribe `callback` to the signal with `name`.
    pub fn subscribe(&self, name: &str, callback: Rc<Callback>) {
        let mut subscribers = self.subscribers.borrow_mut();
        let callbacks = subscribers.entry(name.to_string()).or_default();
        if !callbacks.iter().any(|existing| Rc::ptr_eq(existing, &callback)) {
            callbacks.push(callback);
        }
    }

    /// Unsubscribe callbacks.
    ///
    /// If `callback` is `None`, all callbacks for `name` are removed.
    /// If `name` is `None`, all callbacks are removed.
    pub fn unsubscribe(&self, name: Option<&str>, callback: Option<&Rc<Callback>>) {
        let mut subscribers = self.subscribers.borrow_mut();
        match name {
            None => subscribers.clear(),
            Some(name) => {
                if let Some(callbacks) = subscribers.get_mut(name) {
                    match callback {
                        None => callbacks.clear(),
                        Some(callback) => {
                            callbacks.retain(|existing| !Rc::ptr_eq(existing, callback));
                        }
                    }
                }
            }
        }
    }

    /// Trigger all subscribers for `name`, in subscription order.
    ///
    /// The first failing callback stops the fan-out and its error is
    /// returned to the caller.
    pub fn notify(&self, name: &str, signal: &Signal) -> Result<()> {
        // Callbacks may subscribe or unsubscribe while running, so iterate
        // over a snapshot instead of holding the borrow.
        let callbacks: Vec<Rc<Callback>> = match self.subscribers.borrow().get(name) {
            Some(callbacks) => callbacks.clone(),
            None => return Ok(()),
        };
        for callback in callbacks {
            callback(signal)?;
        }
        Ok(())
    }
}
