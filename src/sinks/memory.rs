//! In-memory capture sink for deterministic assertions

use crate::core::{ErrorSink, LogSink, Meta, Notification, Result, Severity};
use parking_lot::Mutex;

/// One captured sink call
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub level: Severity,
    pub text: String,
    /// Trace, for error notifications
    pub stack: Option<String>,
    pub meta: Meta,
}

/// Records every delivery instead of sending it anywhere.
///
/// Implements both [`LogSink`] and [`ErrorSink`].
///
/// # Example
///
/// ```
/// use rust_log_chain::core::{LogSink, Meta, Severity};
/// use rust_log_chain::sinks::CaptureSink;
///
/// let sink = CaptureSink::new("capture");
/// sink.deliver(Severity::Warn, "disk almost full", &Meta::new()).unwrap();
///
/// assert_eq!(sink.len(), 1);
/// assert_eq!(sink.texts(), vec!["disk almost full".to_string()]);
/// ```
#[derive(Debug)]
pub struct CaptureSink {
    name: String,
    captured: Mutex<Vec<Captured>>,
}

impl CaptureSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            captured: Mutex::new(Vec::new()),
        }
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.captured.lock().iter().map(|c| c.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.captured.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.captured.lock().is_empty()
    }

    pub fn clear(&self) {
        self.captured.lock().clear();
    }
}

impl LogSink for CaptureSink {
    fn deliver(&self, level: Severity, text: &str, meta: &Meta) -> Result<()> {
        self.captured.lock().push(Captured {
            level,
            text: text.to_string(),
            stack: None,
            meta: meta.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl ErrorSink for CaptureSink {
    fn notify_error(&self, level: Severity, notification: Notification<'_>, user: &Meta) -> Result<()> {
        let stack = match notification {
            Notification::Error { stack, .. } => Some(stack.to_string()),
            Notification::Text(_) => None,
        };
        self.captured.lock().push(Captured {
            level,
            text: notification.message().to_string(),
            stack,
            meta: user.clone(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
