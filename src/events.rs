//! Event System
//!
//! Notification events shown to the user and session-level signals

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Info,
    Warning,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    fn new(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(msg.into(), EventType::Warning, LogLevel::Warn)
    }

    pub fn success(msg: impl Into<String>) -> Self {
        Self::new(msg.into(), EventType::Success, LogLevel::Info)
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::new(msg.into(), EventType::Info, LogLevel::Info)
    }

    pub fn should_display(&self) -> bool {
        // Warnings and successes are always user-relevant
        if matches!(self.event_type, EventType::Success | EventType::Warning) {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

/// Signals that change what the whole session shows, independent of any panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server answered 401; the user has to log in again.
    LoginRequired { path: String },
}
