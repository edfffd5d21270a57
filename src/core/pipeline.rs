//! Chain assembly and the `log` entry point

use super::{
    chain_link::{ChainLink, LinkRef},
    config::{seed_tokens, ChainConfig},
    environment::{Environment, ProcessEnv},
    log_event::{LevelInput, LogEvent, Payload},
    meta::Meta,
    settings::{keys, Settings},
    severity::Severity,
    sink::{ErrorSink, LogSink},
};
use crate::links::{ConsoleLink, ErrorNotifierLink, RemoteLogLink};
use crate::sinks::{JsonNotifier, TcpLogSink, TerminalSink, DEFAULT_LOGS_ENDPOINT, DEFAULT_RELEASE_STAGE};
use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Release stages the default notifier reports from
pub const NOTIFY_RELEASE_STAGES: [&str; 2] = ["production", "staging"];

/// The assembled chain: console, then remote log service, then error
/// notifier. Further links can be appended after construction.
pub struct Pipeline {
    config: ChainConfig,
    console: Arc<ConsoleLink>,
    remote: Arc<RemoteLogLink>,
    notifier: Arc<ErrorNotifierLink>,
    chain_end: RwLock<LinkRef>,
}

impl Pipeline {
    /// Pipeline over the process environment with the default sinks
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        PipelineBuilder::new().settings(settings).build()
    }

    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Pack one event and run it through the chain.
    ///
    /// Never fails: anything that goes wrong is reported on stderr.
    pub fn log(&self, level: impl Into<LevelInput>, message: impl Into<Payload>, fragments: &[Meta]) {
        let event = LogEvent::pack(&self.config, level, message, fragments);
        self.dispatch(Some(&event));
    }

    /// Run an already packed event (or none) through the chain
    pub fn dispatch(&self, event: Option<&LogEvent>) {
        let start = self.chain_start();
        match panic::catch_unwind(AssertUnwindSafe(|| start.handle(event))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => eprintln!("[LOGGER ERROR] Chain failed: {}", e),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                eprintln!("[LOGGER CRITICAL] Chain panicked: {}", panic_msg);
            }
        }
    }

    /// Link `link` after the current end and make it the new end
    pub fn append_link(&self, link: LinkRef) {
        let mut end = self.chain_end.write();
        end.link(Some(Arc::clone(&link)));
        *end = link;
    }

    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn chain_start(&self) -> LinkRef {
        Arc::clone(&self.console) as LinkRef
    }

    pub fn chain_end(&self) -> LinkRef {
        self.chain_end.read().clone()
    }

    pub fn console(&self) -> &Arc<ConsoleLink> {
        &self.console
    }

    pub fn remote(&self) -> &Arc<RemoteLogLink> {
        &self.remote
    }

    pub fn notifier(&self) -> &Arc<ErrorNotifierLink> {
        &self.notifier
    }
}

/// Builder for [`Pipeline`]
///
/// # Example
///
/// ```
/// use rust_log_chain::core::{MapEnv, Pipeline, Settings};
/// use rust_log_chain::sinks::CaptureSink;
/// use std::sync::Arc;
///
/// let console = Arc::new(CaptureSink::new("console"));
/// let pipeline = Pipeline::builder()
///     .settings(Settings::new().with("CONSOLE_LOGGING", true))
///     .env(Arc::new(MapEnv::new()))
///     .console_sink(console.clone())
///     .build();
///
/// pipeline.log("warn", "disk almost full", &[]);
/// assert_eq!(console.texts(), vec!["disk almost full".to_string()]);
/// ```
pub struct PipelineBuilder {
    settings: Settings,
    env: Arc<dyn Environment>,
    console_sink: Option<Arc<dyn LogSink>>,
    remote_sink: Option<Arc<dyn LogSink>>,
    notifier_sink: Option<Arc<dyn ErrorSink>>,
    notifier_floor: Option<Severity>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::new(),
            env: Arc::new(ProcessEnv),
            console_sink: None,
            remote_sink: None,
            notifier_sink: None,
            notifier_floor: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the environment source (default: the process environment)
    #[must_use = "builder methods return a new value"]
    pub fn env(mut self, env: Arc<dyn Environment>) -> Self {
        self.env = env;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.console_sink = Some(sink);
        self
    }

    /// Used in place of the TCP sink; still requires `LOGS_TOKEN`
    #[must_use = "builder methods return a new value"]
    pub fn remote_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.remote_sink = Some(sink);
        self
    }

    /// Used in place of the JSON notifier; still requires `BUGS_TOKEN`
    #[must_use = "builder methods return a new value"]
    pub fn notifier_sink(mut self, sink: Arc<dyn ErrorSink>) -> Self {
        self.notifier_sink = Some(sink);
        self
    }

    /// Fixed notifier threshold instead of `MIN_LOG_LEVEL_BUGSNAG`
    #[must_use = "builder methods return a new value"]
    pub fn notifier_floor(mut self, floor: Severity) -> Self {
        self.notifier_floor = Some(floor);
        self
    }

    /// Build the Pipeline
    pub fn build(self) -> Pipeline {
        let settings = seed_tokens(self.settings, self.env.as_ref());
        let config = ChainConfig::new(settings, self.env);

        let remote_sink = self.remote_sink;
        let notifier_sink = self.notifier_sink;

        let mut notifier = ErrorNotifierLink::new(config.clone(), |token| {
            notifier_sink.unwrap_or_else(|| default_notifier(&config, token))
        });
        if let Some(floor) = self.notifier_floor {
            notifier = notifier.with_fixed_floor(floor);
        }
        let notifier = Arc::new(notifier);

        let remote = Arc::new(
            RemoteLogLink::new(config.clone(), |token| {
                remote_sink.unwrap_or_else(|| default_remote(&config, token))
            })
            .with_next(Some(Arc::clone(&notifier) as LinkRef)),
        );

        let console_sink = self
            .console_sink
            .unwrap_or_else(|| Arc::new(TerminalSink::new()) as Arc<dyn LogSink>);
        let console = Arc::new(
            ConsoleLink::new(config.clone(), console_sink)
                .with_next(Some(Arc::clone(&remote) as LinkRef)),
        );

        let chain_end = RwLock::new(Arc::clone(&notifier) as LinkRef);
        Pipeline {
            config,
            console,
            remote,
            notifier,
            chain_end,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_remote(config: &ChainConfig, token: &str) -> Arc<dyn LogSink> {
    let endpoint = config
        .value(keys::LOGS_ENDPOINT)
        .unwrap_or_else(|| DEFAULT_LOGS_ENDPOINT.to_string());
    Arc::new(TcpLogSink::new(endpoint, token))
}

fn default_notifier(config: &ChainConfig, token: &str) -> Arc<dyn ErrorSink> {
    let stage = config
        .env_var(keys::APP_ENV)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_RELEASE_STAGE.to_string());
    let notifier = match config.value(keys::BUGS_ENDPOINT) {
        Some(endpoint) => JsonNotifier::to_tcp(token, endpoint),
        None => JsonNotifier::to_stderr(token),
    };
    Arc::new(
        notifier
            .with_release_stage(stage)
            .with_notify_release_stages(NOTIFY_RELEASE_STAGES),
    )
}
