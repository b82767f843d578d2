//! Common utilities shared across the crate
//!
//! This module contains the error taxonomy and diagnostics bootstrap used by
//! every other component.

pub mod error;
pub mod log;

pub use error::{CommonsError, Result};
pub use log::init_logger;
