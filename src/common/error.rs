//! Error handling module
//!
//! This module defines the structured error type shared by all components.
//! Every variant carries a stable numeric id so that callers can render
//! operator-facing messages without matching on variant names.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Commons error type
#[derive(Error, Debug)]
pub enum CommonsError {
    /// Stored value cannot be coerced to the requested type
    #[error("Wrong {type_name} value for option \"{option}\" in section \"{section}\". {details}")]
    WrongOptionValue {
        type_name: &'static str,
        option: String,
        section: String,
        details: String,
    },

    /// Value cannot be coerced before storage
    #[error("Cannot set {type_name} value {value} for option {option} in {section}. {details}")]
    CannotSetOptionValue {
        type_name: &'static str,
        value: String,
        option: String,
        section: String,
        details: String,
    },

    /// Malformed configuration file content
    #[error("Could not parse the configuration file. {0}")]
    ConfigurationParse(String),

    /// File log handler could not be started
    #[error("Failed to start the log file. {0}")]
    LogFileHandler(String),

    /// Configuration file path does not exist
    #[error("Configuration file \"{0}\" does not exists.")]
    ConfigurationFileNotFound(PathBuf),

    /// Configuration file exists but cannot be read
    #[error("Server process could not read the configuration file \"{0}\".")]
    ConfigurationFileUnreadable(PathBuf),

    /// Syslog handler could not be started
    #[error("Failed to start the Syslog logger. {0}")]
    SyslogHandler(String),

    /// Windows event log handler could not be started
    #[error("Failed to start the Windows Event logger. {0}")]
    WindowsEventLogHandler(String),

    /// Malformed time-interval specification for log rotation
    #[error("Wrong value for logger rotation based on time interval. {0}")]
    RotateEachFormat(String),

    /// Logger could not be configured under the requested account
    #[error("Failed to initialize logger as account \"{account}\". {details}")]
    LoggerAccountSwitch { account: String, details: String },

    /// JSON file could not be read
    #[error("Failed to load JSON file \"{path}\". {details}")]
    JsonFileRead { path: String, details: String },

    /// JSON file content is malformed
    #[error("Bad format for JSON file \"{path}\". {details}")]
    JsonFileFormat { path: String, details: String },

    /// Event definition references a group missing from the catalog
    #[error("Event with id \"{event}\" references unknown group \"{group}\".")]
    UnknownEventGroup { event: String, group: String },

    /// IO error outside the dedicated file variants
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Property path does not resolve to a public attribute
    #[error("No such attribute: {0}")]
    NoSuchAttribute(String),

    /// Property path does not resolve to a section
    #[error("No such section: {0}")]
    NoSuchSection(String),

    /// Create is not supported at the resolved node
    #[error("Create property is not supported here.")]
    CreateNotSupported,

    /// Delete is not supported at the resolved node
    #[error("Delete property is not supported here.")]
    DeleteNotSupported,
}

impl CommonsError {
    /// Stable numeric id attached to each error kind.
    pub fn id(&self) -> u16 {
        match self {
            CommonsError::WrongOptionValue { .. } => 1000,
            CommonsError::CannotSetOptionValue { .. } => 1001,
            CommonsError::ConfigurationParse(_) => 1002,
            CommonsError::LogFileHandler(_) => 1010,
            CommonsError::ConfigurationFileNotFound(_) => 1011,
            CommonsError::ConfigurationFileUnreadable(_) => 1012,
            CommonsError::SyslogHandler(_) => 1013,
            CommonsError::WindowsEventLogHandler(_) => 1014,
            CommonsError::RotateEachFormat(_) => 1023,
            CommonsError::LoggerAccountSwitch { .. } => 1026,
            CommonsError::JsonFileRead { .. } => 1027,
            CommonsError::JsonFileFormat { .. } => 1028,
            CommonsError::UnknownEventGroup { .. } => 1029,
            CommonsError::Io(_) => 1030,
            CommonsError::NoSuchAttribute(_) => 1032,
            CommonsError::NoSuchSection(_) => 1033,
            CommonsError::CreateNotSupported => 1034,
            CommonsError::DeleteNotSupported => 1035,
        }
    }
}

/// Result type alias
///
/// This is a `Result` type alias that uses our structured `CommonsError`.
pub type Result<T> = std::result::Result<T, CommonsError>;
