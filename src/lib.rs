//! # Rust Log Chain
//!
//! A log-routing pipeline built as a chain of responsibility. Each event is
//! packed once into an immutable [`LogEvent`], then handed link to link:
//! console, remote log service, error notifier. Every link decides for
//! itself whether to process the event and always forwards it.
//!
//! ## Features
//!
//! - **Layered configuration**: environment variables override settings,
//!   per-stage thresholds override global ones
//! - **Severity gating**: six ordered levels, unknown tokens fall back to a
//!   configurable default
//! - **Extensible**: append custom links to a running pipeline
//! - **Thread Safe**: links are `Send + Sync` and shareable behind `Arc`
//!
//! ## Example
//!
//! ```
//! use rust_log_chain::prelude::*;
//! use std::sync::Arc;
//!
//! let settings = Settings::new()
//!     .with("CONSOLE_LOGGING", true)
//!     .with("MIN_LOG_LEVEL", "warn");
//! let pipeline = Pipeline::builder()
//!     .settings(settings)
//!     .env(Arc::new(MapEnv::new()))
//!     .build();
//! let logger = Logger::new(Arc::new(pipeline));
//!
//! logger.info("filtered out", &[]);
//! logger.error("printed to stderr", &[Meta::new().with_field("reqId", "r-1")]);
//! ```

pub mod boot;
pub mod core;
pub mod facade;
pub mod links;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::boot::{configure, instance, Toolkit};
    pub use crate::core::{
        ChainConfig, ChainError, ChainLink, ErrorReport, ErrorSink, FieldValue, LinkCore, LinkRef,
        LogEvent, LogSink, MapEnv, Meta, Notification, Payload, Pipeline, PipelineBuilder,
        ProcessEnv, Result, Settings, Severity,
    };
    pub use crate::facade::{Logger, Notifier};
    pub use crate::links::{ConsoleLink, ErrorNotifierLink, RemoteLogLink};
    pub use crate::sinks::{CaptureSink, JsonNotifier, TcpLogSink, TerminalSink};
}

pub use crate::core::{
    ChainConfig, ChainError, ChainLink, ErrorReport, FieldValue, LinkCore, LinkRef, LogEvent, Meta,
    Payload, Pipeline, PipelineBuilder, Result, Settings, Severity,
};
pub use facade::{Logger, Notifier};
