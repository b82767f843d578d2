//! Diagnostics logging helpers
//!
//! This module configures the crate's own diagnostic output. It is separate
//! from the product-facing [`crate::logger::Logger`] component.

/// Initialize the diagnostics logger
///
/// # Parameters
///
/// * `level` - default filter used when `RUST_LOG` is not set
pub fn init_logger(level: &str) {
    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    env_logger::init_from_env(env);
}
