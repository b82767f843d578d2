//! Server Commons: configuration tree, event dispatch and logging commons
//!
//! This library provides the shared infrastructure used by server products:
//! an INI-backed configuration proxy with typed accessors and sentinel
//! decoding, a path-addressed property protocol over a tree of typed
//! configuration sections, an observer for change notification, a JSON
//! events catalog with group filtering, and a product logger with file,
//! syslog and standard output handlers driven live by the configuration.
//!
//! # Main Features
//!
//! - Typed get/set over classic INI files with `disabled`/`inherit`
//!   sentinel decoding and order-preserving save
//! - Capability-schema driven property protocol: read, write, create and
//!   delete over `/`-delimited paths
//! - Change signals with transactional semantics: a failed subscriber
//!   reverts the stored value
//! - Events catalog with zero-padded ids, group filtering and `%(name)s`
//!   message interpolation
//! - Logger with live reconfiguration which never drops its destination
//!
//! # Example
//!
//! ```no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use server_commons::config::{FileConfigurationProxy, LogConfigurationSection};
//! use server_commons::logger::Logger;
//! use server_commons::Result;
//!
//! fn main() -> Result<()> {
//!     let mut proxy = FileConfigurationProxy::from_path(
//!         "server.ini",
//!         Some(LogConfigurationSection::defaults()),
//!     )?;
//!     proxy.load()?;
//!     let proxy = Rc::new(RefCell::new(proxy));
//!
//!     let section = Rc::new(LogConfigurationSection::new(proxy));
//!     let logger = Rc::new(Logger::new());
//!     logger.add_default_stdout_handler();
//!     logger.configure(section, None)?;
//!
//!     logger.debug("server starting");
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod events;
pub mod logger;
pub mod observer;

// Re-export commonly used items
pub use common::{init_logger, CommonsError, Result};
pub use config::{FileConfigurationProxy, LogConfigurationSection, PropertySection};
pub use events::{EventsDefinition, EventsHandler};
pub use logger::{LogEntry, Logger};
pub use observer::{Observer, Signal};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
