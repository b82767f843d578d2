//! Log entry
//!
//! The unit of product logging: every handler receives the same entry and
//! renders it through the shared line format.

use std::collections::HashMap;
use std::net::SocketAddr;

use chrono::{DateTime, Local};

/// Timestamp format used by the human-readable renderers.
pub const LOGGER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An entry received by all log handlers.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub message_id: String,
    pub text: String,
    pub avatar: Option<String>,
    pub peer: Option<SocketAddr>,
    pub data: Option<HashMap<String, String>>,
    pub timestamp: DateTime<Local>,
}

impl LogEntry {
    pub fn new(
        message_id: &str,
        text: &str,
        avatar: Option<String>,
        peer: Option<SocketAddr>,
        data: Option<HashMap<String, String>>,
    ) -> Self {
        LogEntry {
            message_id: message_id.to_string(),
            text: text.to_string(),
            avatar,
            peer,
            data,
            timestamp: Local::now(),
        }
    }

    /// Entry with only an id and a text.
    pub fn simple(message_id: &str, text: &str) -> Self {
        LogEntry::new(message_id, text, None, None, None)
    }

    /// Human readable avatar name, `None` string without an account.
    pub fn avatar_hr(&self) -> String {
        match &self.avatar {
            Some(avatar) => avatar.clone(),
            None => "None".to_string(),
        }
    }

    /// Human readable peer address, `None` string without a peer.
    pub fn peer_hr(&self) -> String {
        match &self.peer {
            Some(peer) => peer.to_string(),
            None => "None".to_string(),
        }
    }

    pub fn timestamp_hr(&self) -> String {
        self.timestamp.format(LOGGER_TIMESTAMP_FORMAT).to_string()
    }

    /// Human readable service name taken from the entry data.
    pub fn service_hr(&self) -> String {
        self.data
            .as_ref()
            .and_then(|data| data.get("service").cloned())
            .unwrap_or_else(|| "None".to_string())
    }

    /// Shared line rendering used by every handler.
    pub fn format_line(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.message_id,
            self.timestamp_hr(),
            self.service_hr(),
            self.avatar_hr(),
            self.peer_hr(),
            self.text,
        )
    }
}
