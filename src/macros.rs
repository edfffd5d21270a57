//! Logging macros with `format!`-style arguments.
//!
//! They work with anything exposing `log(level, message, fragments)`:
//! a [`Logger`](crate::Logger) or a [`Pipeline`](crate::core::Pipeline).
//! Metadata fragments go in square brackets before the format string.
//!
//! # Examples
//!
//! ```
//! use rust_log_chain::prelude::*;
//! use rust_log_chain::info;
//! use std::sync::Arc;
//!
//! let pipeline = Pipeline::builder().env(Arc::new(MapEnv::new())).build();
//! let logger = Logger::new(Arc::new(pipeline));
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! let request = Meta::new().with_field("reqId", "r-17");
//! info!(logger, [request], "Handled {} in {}ms", "/health", 3);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_log_chain::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::new(Arc::new(Pipeline::builder().env(Arc::new(MapEnv::new())).build()));
/// use rust_log_chain::log;
/// log!(logger, Severity::Info, "Simple message");
/// log!(logger, "warn", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($meta:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[$($meta),*])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[])
    };
}

/// Log a silly-level message.
#[macro_export]
macro_rules! silly {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Silly, $($arg)+)
    };
}

/// Log a verbose-level message.
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Verbose, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_chain::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::new(Arc::new(Pipeline::builder().env(Arc::new(MapEnv::new())).build()));
/// use rust_log_chain::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_chain::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::new(Arc::new(Pipeline::builder().env(Arc::new(MapEnv::new())).build()));
/// use rust_log_chain::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, [Meta::new().with_field("notify", false)], "Code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::core::Severity::Error, $($arg)+)
    };
}
