//! Error types for the log chain

pub type Result<T> = std::result::Result<T, ChainError>;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// A chain link contract method was invoked without being overridden
    #[error("Not implemented: {link}::{operation}")]
    NotImplemented {
        link: String,
        operation: &'static str,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A sink failed to deliver an event
    #[error("Sink '{sink}' failed: {message}")]
    Sink { sink: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ChainError {
    /// Create a not-implemented error for a contract method
    pub fn not_implemented(link: impl Into<String>, operation: &'static str) -> Self {
        ChainError::NotImplemented {
            link: link.into(),
            operation,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a sink delivery error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        ChainError::Sink {
            sink: sink.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ChainError::Other(msg.into())
    }
}
