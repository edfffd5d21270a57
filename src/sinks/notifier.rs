//! JSON error-notification sink
//!
//! Each notification is one JSON document per line, shaped like an
//! error-reporting service payload: api key, release stage, and one event
//! with its exception, trace lines and user metadata.

use super::network::TcpTransport;
use crate::core::{ErrorSink, Meta, Notification, Result, Severity};
use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Release stage used when none is configured
pub const DEFAULT_RELEASE_STAGE: &str = "dev";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload<'a> {
    pub api_key: &'a str,
    pub notifier: NotifierInfo,
    pub events: Vec<NotificationEvent<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NotifierInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent<'a> {
    pub severity: &'static str,
    pub release_stage: &'a str,
    pub received_at: String,
    pub exceptions: Vec<ExceptionInfo<'a>>,
    pub meta_data: UserMeta<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionInfo<'a> {
    pub error_class: &'static str,
    pub message: &'a str,
    pub stacktrace: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct UserMeta<'a> {
    pub user: &'a Meta,
}

enum Target {
    Writer(Box<dyn Write + Send>),
    Tcp(TcpTransport),
}

pub struct JsonNotifier {
    api_key: String,
    release_stage: String,
    notify_release_stages: Option<Vec<String>>,
    target: Mutex<Target>,
}

impl JsonNotifier {
    pub fn new(api_key: impl Into<String>, writer: Box<dyn Write + Send>) -> Self {
        Self::with_target(api_key.into(), Target::Writer(writer))
    }

    pub fn to_stderr(api_key: impl Into<String>) -> Self {
        Self::new(api_key, Box::new(std::io::stderr()))
    }

    /// Append notifications to a file
    pub fn to_file<P: AsRef<Path>>(api_key: impl Into<String>, path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(api_key, Box::new(BufWriter::new(file))))
    }

    pub fn to_tcp(api_key: impl Into<String>, address: impl Into<String>) -> Self {
        Self::with_target(api_key.into(), Target::Tcp(TcpTransport::new(address)))
    }

    fn with_target(api_key: String, target: Target) -> Self {
        Self {
            api_key,
            release_stage: DEFAULT_RELEASE_STAGE.to_string(),
            notify_release_stages: None,
            target: Mutex::new(target),
        }
    }

    #[must_use]
    pub fn with_release_stage(mut self, stage: impl Into<String>) -> Self {
        self.release_stage = stage.into();
        self
    }

    /// Only send while the release stage is one of `stages`
    #[must_use]
    pub fn with_notify_release_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notify_release_stages = Some(stages.into_iter().map(Into::into).collect());
        self
    }

    pub fn release_stage(&self) -> &str {
        &self.release_stage
    }

    pub fn should_notify(&self) -> bool {
        self.notify_release_stages
            .as_ref()
            .map_or(true, |stages| stages.iter().any(|s| *s == self.release_stage))
    }

    /// Serialized payload, without trailing newline
    pub fn render(&self, level: Severity, notification: Notification<'_>, user: &Meta) -> Result<String> {
        let (error_class, stacktrace): (&'static str, Vec<&str>) = match notification {
            Notification::Error { stack, .. } => ("Error", stack.lines().collect()),
            Notification::Text(_) => ("Message", Vec::new()),
        };
        let payload = NotificationPayload {
            api_key: &self.api_key,
            notifier: NotifierInfo {
                name: env!("CARGO_PKG_NAME"),
                version: env!("CARGO_PKG_VERSION"),
            },
            events: vec![NotificationEvent {
                severity: severity_name(level),
                release_stage: &self.release_stage,
                received_at: Utc::now().to_rfc3339(),
                exceptions: vec![ExceptionInfo {
                    error_class,
                    message: notification.message(),
                    stacktrace,
                }],
                meta_data: UserMeta { user },
            }],
        };
        Ok(serde_json::to_string(&payload)?)
    }
}

/// Map to the three severities notification services understand
fn severity_name(level: Severity) -> &'static str {
    match level {
        Severity::Error => "error",
        Severity::Warn => "warning",
        _ => "info",
    }
}

impl ErrorSink for JsonNotifier {
    fn notify_error(&self, level: Severity, notification: Notification<'_>, user: &Meta) -> Result<()> {
        if !self.should_notify() {
            return Ok(());
        }
        let mut line = self.render(level, notification, user)?;
        line.push('\n');

        match &mut *self.target.lock() {
            Target::Writer(writer) => {
                writer.write_all(line.as_bytes())?;
                writer.flush()?;
                Ok(())
            }
            Target::Tcp(transport) => transport.send(line.as_bytes()),
        }
    }

    fn name(&self) -> &str {
        "json-notifier"
    }
}
