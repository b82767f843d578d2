//! Events catalog and dispatch
//!
//! Loading of the JSON events catalog and the handler routing emitted
//! events to the logger.

pub mod definition;
pub mod handler;
pub mod json_file;

pub use definition::{EventDefinition, EventGroupDefinition, EventsDefinition};
pub use handler::{EventContext, EventsHandler};
pub use json_file::JsonFile;
