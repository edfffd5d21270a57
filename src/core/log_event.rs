//! Immutable log event built once per `log` call

use super::config::ChainConfig;
use super::meta::{fields, FieldValue, Meta};
use super::settings::keys;
use super::severity::Severity;
use serde::Serialize;
use std::error::Error as StdError;

/// Text used when an error carries an empty message
pub const EMPTY_ERROR_TEXT: &str = "Error: ";

/// Message and trace captured from an error value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    message: String,
    stack: String,
}

impl ErrorReport {
    pub fn new(message: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Capture an error and its `source()` chain.
    ///
    /// The trace reads `Error: <message>` followed by one
    /// `    caused by: <source>` line per source.
    pub fn from_error(error: &(dyn StdError + 'static)) -> Self {
        let message = error.to_string();
        let mut stack = format!("Error: {}", message);
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        Self { message, stack }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn stack(&self) -> &str {
        &self.stack
    }
}

/// The message argument of a `log` call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Payload {
    Text(String),
    Error(ErrorReport),
    /// No message at all
    #[default]
    Absent,
}

impl Payload {
    pub fn error(error: &(dyn StdError + 'static)) -> Self {
        Payload::Error(ErrorReport::from_error(error))
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&String> for Payload {
    fn from(s: &String) -> Self {
        Payload::Text(s.clone())
    }
}

impl From<ErrorReport> for Payload {
    fn from(report: ErrorReport) -> Self {
        Payload::Error(report)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(value: Option<T>) -> Self {
        value.map_or(Payload::Absent, Into::into)
    }
}

/// The level argument of a `log` call; `None` means "use the default"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelInput(Option<String>);

impl LevelInput {
    pub fn none() -> Self {
        LevelInput(None)
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref().filter(|s| !s.is_empty())
    }
}

impl From<Severity> for LevelInput {
    fn from(level: Severity) -> Self {
        LevelInput(Some(level.to_str().to_string()))
    }
}

impl From<&str> for LevelInput {
    fn from(s: &str) -> Self {
        LevelInput(Some(s.to_string()))
    }
}

impl From<String> for LevelInput {
    fn from(s: String) -> Self {
        LevelInput(Some(s))
    }
}

impl<T: Into<LevelInput>> From<Option<T>> for LevelInput {
    fn from(value: Option<T>) -> Self {
        value.map_or(LevelInput(None), Into::into)
    }
}

/// One log call, frozen.
///
/// Fields are only reachable through accessors and links receive
/// `&LogEvent`, so nothing downstream can change what the next link sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    level: String,
    text: String,
    meta: Meta,
}

impl LogEvent {
    /// Build an event from raw `log` arguments.
    ///
    /// The level falls back to `DEFAULT_LOG_LEVEL` (environment, then
    /// settings) and finally `info`. Errors contribute their trace as
    /// `meta.stack`. Fragments are merged in order, later keys winning.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_chain::core::{ChainConfig, LogEvent, Meta, Settings};
    ///
    /// let config = ChainConfig::from_process(Settings::new());
    /// let event = LogEvent::pack(
    ///     &config,
    ///     "warn",
    ///     "disk almost full",
    ///     &[Meta::new().with_field("a", 1).with_field("b", 1), Meta::new().with_field("b", 2)],
    /// );
    ///
    /// assert_eq!(event.level(), "warn");
    /// assert_eq!(event.meta().get("b").map(|v| v.to_string()), Some("2".to_string()));
    /// assert_eq!(event.meta().notify(), Some(true));
    /// ```
    pub fn pack(
        config: &ChainConfig,
        level: impl Into<LevelInput>,
        message: impl Into<Payload>,
        fragments: &[Meta],
    ) -> Self {
        let level = match level.into().as_deref() {
            Some(level) => level.to_string(),
            None => config
                .value(keys::DEFAULT_LOG_LEVEL)
                .unwrap_or_else(|| Severity::Info.to_str().to_string()),
        };

        let instance_id = FieldValue::from(config.env_var(keys::HOSTNAME));
        let mut meta = Meta::new();

        let text = match message.into() {
            Payload::Text(text) => text,
            Payload::Absent => String::new(),
            Payload::Error(report) => {
                meta.add_field(fields::STACK, report.stack);
                if report.message.is_empty() {
                    EMPTY_ERROR_TEXT.to_string()
                } else {
                    report.message
                }
            }
        };
        meta.add_field(fields::NOTIFY, true);
        meta.add_field(fields::INSTANCE_ID, instance_id);

        for fragment in fragments {
            meta.merge(fragment);
        }

        Self { level, text, meta }
    }

    /// Raw level token, resolved against a severity model when compared
    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn is_error(&self) -> bool {
        self.meta.stack().is_some()
    }
}
