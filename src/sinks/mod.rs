//! Sink implementations

pub mod console;
pub mod memory;
pub mod network;
pub mod notifier;

pub use console::TerminalSink;
pub use memory::{CaptureSink, Captured};
pub use network::{TcpLogSink, TcpTransport, DEFAULT_LOGS_ENDPOINT};
pub use notifier::{JsonNotifier, DEFAULT_RELEASE_STAGE};

// Re-export traits for convenience
pub use crate::core::{ErrorSink, LogSink};
