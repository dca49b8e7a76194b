//! User-facing notifications published by the store.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// An operation completed
    Success,
    /// Progress or neutral state change
    Info,
    /// An operation failed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Error => "error",
        };
        f.write_str(label)
    }
}

/// A message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity
    pub severity: Severity,
    /// Human-readable text
    pub message: String,
    /// How long the message should stay visible
    pub display_for: Duration,
}

impl Notification {
    /// Creates a notification
    pub fn new(severity: Severity, message: impl Into<String>, display_for: Duration) -> Self {
        Self {
            severity,
            message: message.into(),
            display_for,
        }
    }

    /// Success notification
    pub fn success(message: impl Into<String>, display_for: Duration) -> Self {
        Self::new(Severity::Success, message, display_for)
    }

    /// Informational notification
    pub fn info(message: impl Into<String>, display_for: Duration) -> Self {
        Self::new(Severity::Info, message, display_for)
    }

    /// Error notification
    pub fn error(message: impl Into<String>, display_for: Duration) -> Self {
        Self::new(Severity::Error, message, display_for)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
