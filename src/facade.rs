//! Caller-facing handles over a [`Pipeline`]
//!
//! [`Logger`] offers one method per severity plus a simple profiler.
//! [`Notifier`] reports straight to the error-notification sink without
//! walking the rest of the chain.

use crate::core::{ChainLink, LevelInput, LogEvent, Meta, Payload, Pipeline, Severity};
use crate::links::ErrorNotifierLink;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Meta key carrying a profile's elapsed milliseconds
pub const DURATION_FIELD: &str = "durationMs";

/// Forwarding function for one severity
pub type LevelHelper = fn(&Logger, Payload, &[Meta]);

/// Level-named logging over a shared pipeline.
///
/// # Example
///
/// ```
/// use rust_log_chain::core::{MapEnv, Meta, Pipeline, Settings};
/// use rust_log_chain::sinks::CaptureSink;
/// use rust_log_chain::Logger;
/// use std::sync::Arc;
///
/// let console = Arc::new(CaptureSink::new("console"));
/// let pipeline = Pipeline::builder()
///     .settings(Settings::new().with("CONSOLE_LOGGING", true))
///     .env(Arc::new(MapEnv::new()))
///     .console_sink(console.clone())
///     .build();
/// let logger = Logger::new(Arc::new(pipeline));
///
/// logger.warn("cache miss", &[Meta::new().with_field("key", "user:1")]);
/// logger.debug("below the default threshold", &[]);
///
/// assert_eq!(console.texts(), vec!["cache miss".to_string()]);
/// ```
pub struct Logger {
    pipeline: Arc<Pipeline>,
    timers: Mutex<HashMap<String, Instant>>,
}

impl Logger {
    /// Indexed by [`Severity::rank`]
    pub const LEVEL_HELPERS: [(Severity, LevelHelper); 6] = [
        (Severity::Silly, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Silly, message, fragments)
        }),
        (Severity::Verbose, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Verbose, message, fragments)
        }),
        (Severity::Debug, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Debug, message, fragments)
        }),
        (Severity::Info, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Info, message, fragments)
        }),
        (Severity::Warn, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Warn, message, fragments)
        }),
        (Severity::Error, |logger: &Logger, message: Payload, fragments: &[Meta]| {
            logger.log(Severity::Error, message, fragments)
        }),
    ];

    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    pub fn log(&self, level: impl Into<LevelInput>, message: impl Into<Payload>, fragments: &[Meta]) {
        self.pipeline.log(level, message, fragments);
    }

    pub fn helper(level: Severity) -> LevelHelper {
        Self::LEVEL_HELPERS[level.rank() as usize].1
    }

    /// Start a timer for `label`, or stop it and log the elapsed time.
    ///
    /// The stopping call logs `label` at `info` with `durationMs` in the
    /// metadata and returns the elapsed time.
    pub fn profile(&self, label: &str) -> Option<Duration> {
        let started = {
            let mut timers = self.timers.lock();
            match timers.remove(label) {
                Some(started) => started,
                None => {
                    timers.insert(label.to_string(), Instant::now());
                    return None;
                }
            }
        };

        let elapsed = started.elapsed();
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.log(
            Severity::Info,
            label,
            &[Meta::new().with_field(DURATION_FIELD, millis)],
        );
        Some(elapsed)
    }
}

macro_rules! level_methods {
    ($($name:ident => $level:ident),* $(,)?) => {
        impl Logger {
            $(
                pub fn $name(&self, message: impl Into<Payload>, fragments: &[Meta]) {
                    (Self::helper(Severity::$level))(self, message.into(), fragments)
                }
            )*
        }
    };
}

level_methods! {
    silly => Silly,
    verbose => Verbose,
    debug => Debug,
    info => Info,
    warn => Warn,
    error => Error,
}

/// Error reporting that only reaches the notification sink.
///
/// Owns a private [`ErrorNotifierLink`] with no next link, so notified
/// events never show up in the console or the remote log.
pub struct Notifier {
    link: ErrorNotifierLink,
}

impl Notifier {
    pub fn new(link: ErrorNotifierLink) -> Self {
        Self { link }
    }

    /// Notifier sharing the pipeline's configuration, notification sink and
    /// floor. Not ready when the pipeline's notifier stage is not.
    pub fn for_pipeline(pipeline: &Pipeline) -> Self {
        let stage = pipeline.notifier();
        let link = ErrorNotifierLink::with_sink(pipeline.config().clone(), stage.notifier().cloned());
        let link = match stage.fixed_floor() {
            Some(floor) => link.with_fixed_floor(floor),
            None => link,
        };
        Self { link }
    }

    pub fn link(&self) -> &ErrorNotifierLink {
        &self.link
    }

    /// Report at the default level
    pub fn notify(&self, message: impl Into<Payload>, fragments: &[Meta]) {
        let event = LogEvent::pack(self.link.core().config(), LevelInput::none(), message, fragments);
        if let Err(e) = self.link.handle(Some(&event)) {
            eprintln!("[LOGGER ERROR] Notifier failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::keys;
    use crate::core::{ErrorReport, MapEnv, Settings};
    use crate::sinks::CaptureSink;
    use std::thread;

    struct Fixture {
        logger: Logger,
        console: Arc<CaptureSink>,
        notifier: Arc<CaptureSink>,
    }

    fn fixture(settings: Settings) -> Fixture {
        let console = Arc::new(CaptureSink::new("console"));
        let notifier = Arc::new(CaptureSink::new("notifier"));
        let pipeline = Pipeline::builder()
            .settings(settings)
            .env(Arc::new(MapEnv::new()))
            .console_sink(console.clone())
            .remote_sink(Arc::new(CaptureSink::new("remote")))
            .notifier_sink(notifier.clone())
            .build();
        Fixture {
            logger: Logger::new(Arc::new(pipeline)),
            console,
            notifier,
        }
    }

    fn console_only() -> Settings {
        Settings::new()
            .with(keys::CONSOLE_LOGGING, true)
            .with(keys::MIN_LOG_LEVEL, "silly")
    }

    #[test]
    fn test_helper_table_in_rank_order() {
        for (index, (level, _)) in Logger::LEVEL_HELPERS.iter().enumerate() {
            assert_eq!(level.rank() as usize, index);
        }
    }

    #[test]
    fn test_level_methods_use_their_level() {
        let f = fixture(console_only());
        f.logger.silly("a", &[]);
        f.logger.verbose("b", &[]);
        f.logger.debug("c", &[]);
        f.logger.info("d", &[]);
        f.logger.warn("e", &[]);
        f.logger.error("f", &[]);

        let levels: Vec<Severity> = f.console.captured().iter().map(|c| c.level).collect();
        assert_eq!(levels, Severity::ALL.to_vec());
    }

    #[test]
    fn test_helper_lookup() {
        let f = fixture(console_only());
        (Logger::helper(Severity::Warn))(&f.logger, Payload::from("via table"), &[]);

        let captured = f.console.captured();
        assert_eq!(captured[0].level, Severity::Warn);
        assert_eq!(captured[0].text, "via table");
    }

    #[test]
    fn test_error_payload() {
        let f = fixture(console_only());
        f.logger.error(ErrorReport::new("boom", "Error: boom"), &[]);

        let captured = f.console.captured();
        assert_eq!(captured[0].text, "boom");
        assert_eq!(captured[0].meta.stack(), Some("Error: boom"));
    }

    #[test]
    fn test_profile() {
        let f = fixture(console_only());
        assert!(f.logger.profile("load").is_none());
        assert!(f.console.is_empty());

        thread::sleep(Duration::from_millis(5));
        let elapsed = f.logger.profile("load").unwrap();
        assert!(elapsed >= Duration::from_millis(5));

        let captured = f.console.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].level, Severity::Info);
        assert_eq!(captured[0].text, "load");
        assert!(captured[0].meta.contains(DURATION_FIELD));

        // Timer restarts after being reported
        assert!(f.logger.profile("load").is_none());
    }

    #[test]
    fn test_notifier_skips_rest_of_chain() {
        let settings = console_only()
            .with(keys::BUGSNAG_LOGGING, true)
            .with(keys::BUGS_TOKEN, "bugs");
        let f = fixture(settings);
        let notifier = Notifier::for_pipeline(f.logger.pipeline());

        notifier.notify(ErrorReport::new("payment failed", "Error: payment failed"), &[]);

        assert!(f.console.is_empty());
        let captured = f.notifier.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].level, Severity::Info);
        assert_eq!(captured[0].stack.as_deref(), Some("Error: payment failed"));
        assert!(notifier.link().next().is_none());
    }

    #[test]
    fn test_notifier_follows_pipeline_readiness() {
        let f = fixture(Settings::new().with(keys::BUGSNAG_LOGGING, true));
        let pipeline = f.logger.pipeline();
        let notifier = Notifier::for_pipeline(pipeline);

        assert!(!pipeline.notifier().is_ready().unwrap());
        assert!(!notifier.link().is_ready().unwrap());
        notifier.notify("dropped", &[]);
        assert!(f.notifier.is_empty());

        let settings = Settings::new()
            .with(keys::BUGSNAG_LOGGING, true)
            .with(keys::BUGS_TOKEN, "bugs");
        let f = fixture(settings);
        let notifier = Notifier::for_pipeline(f.logger.pipeline());
        assert!(notifier.link().is_ready().unwrap());
        assert!(Arc::ptr_eq(
            notifier.link().notifier().unwrap(),
            f.logger.pipeline().notifier().notifier().unwrap(),
        ));
    }

    #[test]
    fn test_notifier_copies_fixed_floor() {
        let notifier_sink = Arc::new(CaptureSink::new("notifier"));
        let pipeline = Pipeline::builder()
            .settings(
                Settings::new()
                    .with(keys::BUGSNAG_LOGGING, true)
                    .with(keys::BUGS_TOKEN, "bugs"),
            )
            .env(Arc::new(MapEnv::new()))
            .console_sink(Arc::new(CaptureSink::new("console")))
            .remote_sink(Arc::new(CaptureSink::new("remote")))
            .notifier_sink(notifier_sink.clone())
            .notifier_floor(Severity::Error)
            .build();
        let notifier = Notifier::for_pipeline(&pipeline);

        assert_eq!(notifier.link().threshold(), Severity::Error);
        notifier.notify("below floor", &[]);
        assert!(notifier_sink.is_empty());
    }

    #[test]
    fn test_notifier_respects_opt_out() {
        let settings = Settings::new()
            .with(keys::BUGSNAG_LOGGING, true)
            .with(keys::BUGS_TOKEN, "bugs");
        let f = fixture(settings);
        let notifier = Notifier::for_pipeline(f.logger.pipeline());

        notifier.notify("quiet", &[Meta::new().with_field("notify", false)]);

        assert!(f.notifier.is_empty());
    }
}
