//! Core chain types and traits

pub mod chain_link;
pub mod config;
pub mod environment;
pub mod error;
pub mod log_event;
pub mod meta;
pub mod metrics;
pub mod pipeline;
pub mod prefix;
pub mod settings;
pub mod severity;
pub mod sink;

pub use chain_link::{ChainLink, LinkCore, LinkRef};
pub use config::ChainConfig;
pub use environment::{Environment, MapEnv, ProcessEnv};
pub use error::{ChainError, Result};
pub use log_event::{ErrorReport, LevelInput, LogEvent, Payload};
pub use meta::{FieldValue, Meta};
pub use metrics::LinkMetrics;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use settings::{SettingValue, Settings};
pub use severity::{Severity, SeverityModel};
pub use sink::{ErrorSink, LogSink, Notification};
