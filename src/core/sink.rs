//! Delivery capabilities wrapped by chain links

use super::error::Result;
use super::meta::Meta;
use super::severity::Severity;

/// Plain log delivery (terminal, remote log collector)
pub trait LogSink: Send + Sync {
    fn deliver(&self, level: Severity, text: &str, meta: &Meta) -> Result<()>;
    fn name(&self) -> &str;
}

/// What an error notification carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification<'a> {
    /// Event built from an error: message plus its trace
    Error { message: &'a str, stack: &'a str },
    /// Plain text event
    Text(&'a str),
}

impl Notification<'_> {
    pub fn message(&self) -> &str {
        match *self {
            Notification::Error { message, .. } => message,
            Notification::Text(text) => text,
        }
    }
}

/// Error-notification delivery
pub trait ErrorSink: Send + Sync {
    fn notify_error(&self, level: Severity, notification: Notification<'_>, user: &Meta) -> Result<()>;
    fn name(&self) -> &str;
}
