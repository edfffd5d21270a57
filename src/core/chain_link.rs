//! Chain link contract and shared link state
//!
//! A chain is a singly linked list of [`ChainLink`]s. Every link makes a
//! local decision about the event and then hands the very same event to the
//! next link, whether or not it processed it. The end of the chain is a link
//! without a next pointer.

use super::config::ChainConfig;
use super::error::{ChainError, Result};
use super::log_event::LogEvent;
use super::metrics::LinkMetrics;
use super::settings::keys;
use super::severity::{Severity, SeverityModel};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a link in a chain
pub type LinkRef = Arc<dyn ChainLink>;

/// A stage of the log chain.
///
/// Implementors provide [`core`](ChainLink::core) and override
/// [`is_ready`](ChainLink::is_ready), [`is_enabled`](ChainLink::is_enabled)
/// and [`process`](ChainLink::process). The provided versions of those three
/// return [`ChainError::NotImplemented`].
///
/// # Example
///
/// ```
/// use rust_log_chain::core::{ChainConfig, ChainLink, LinkCore, LogEvent, Result, Settings};
/// use std::sync::Arc;
///
/// struct Audit {
///     core: LinkCore,
/// }
///
/// impl ChainLink for Audit {
///     fn core(&self) -> &LinkCore {
///         &self.core
///     }
///
///     fn is_ready(&self) -> Result<bool> {
///         Ok(true)
///     }
///
///     fn is_enabled(&self) -> Result<bool> {
///         Ok(true)
///     }
///
///     fn process(&self, event: &LogEvent) -> Result<()> {
///         println!("audit: {}", event.text());
///         Ok(())
///     }
/// }
///
/// let config = ChainConfig::from_process(Settings::new());
/// let audit = Arc::new(Audit { core: LinkCore::new("Audit", config.clone()) });
/// let event = LogEvent::pack(&config, "info", "user signed in", &[]);
/// audit.handle(Some(&event)).unwrap();
/// assert_eq!(audit.core().metrics().handled(), 1);
/// ```
pub trait ChainLink: Send + Sync {
    fn core(&self) -> &LinkCore;

    /// Whether the wrapped sink was provisioned at construction
    fn is_ready(&self) -> Result<bool> {
        Err(ChainError::not_implemented(self.core().name(), "is_ready"))
    }

    /// Whether the stage is switched on
    fn is_enabled(&self) -> Result<bool> {
        Err(ChainError::not_implemented(self.core().name(), "is_enabled"))
    }

    /// Local work for one event; only called on a ready, enabled link
    fn process(&self, _event: &LogEvent) -> Result<()> {
        Err(ChainError::not_implemented(self.core().name(), "process"))
    }

    /// Process the event locally if possible, then forward it.
    ///
    /// The event is forwarded even when the local step fails; the local
    /// error is returned in preference to one from further down the chain.
    /// Must not be overridden in a way that skips forwarding.
    fn handle(&self, event: Option<&LogEvent>) -> Result<()> {
        self.core().metrics().record_handled();
        let local = match event {
            Some(event) => process_if_active(self, event),
            None => Ok(()),
        };
        let forwarded = self.core().forward(event);
        local.and(forwarded)
    }

    /// Rebind the next pointer
    fn link(&self, next: Option<LinkRef>) {
        self.core().link(next);
    }

    fn next(&self) -> Option<LinkRef> {
        self.core().next()
    }
}

fn process_if_active<L: ChainLink + ?Sized>(link: &L, event: &LogEvent) -> Result<()> {
    if link.is_ready()? && link.is_enabled()? {
        link.process(event)?;
    }
    Ok(())
}

/// State every link carries: configuration, severity model, next pointer and
/// counters.
pub struct LinkCore {
    name: String,
    config: ChainConfig,
    severity: SeverityModel,
    next: RwLock<Option<LinkRef>>,
    metrics: LinkMetrics,
}

impl LinkCore {
    /// The severity model's default level is resolved here, once.
    pub fn new(name: impl Into<String>, config: ChainConfig) -> Self {
        let severity = SeverityModel::from_config(&config);
        Self {
            name: name.into(),
            config,
            severity,
            next: RwLock::new(None),
            metrics: LinkMetrics::new(),
        }
    }

    #[must_use]
    pub fn with_next(self, next: Option<LinkRef>) -> Self {
        *self.next.write() = next;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn severity(&self) -> &SeverityModel {
        &self.severity
    }

    pub fn metrics(&self) -> &LinkMetrics {
        &self.metrics
    }

    /// Feature flag, environment first
    pub fn flag(&self, key: &str) -> bool {
        self.config.flag(key)
    }

    /// Minimum level for `stage`.
    ///
    /// Sources, highest priority first: env `MIN_LOG_LEVEL_<STAGE>`, settings
    /// `MIN_LOG_LEVEL_<STAGE>`, env `MIN_LOG_LEVEL`, settings `MIN_LOG_LEVEL`.
    /// The first one holding a value wins. A value that is not a level, or
    /// no value at all, gives the default level.
    pub fn min_level(&self, stage: &str) -> Severity {
        let stage_key = keys::stage_min_level(stage);
        match self.config.first_value(&[stage_key.as_str(), keys::MIN_LOG_LEVEL]) {
            Some(token) => self.severity.resolve(&token),
            None => self.severity.default_level(),
        }
    }

    /// Event level, unknown tokens resolved to the default
    pub fn event_level(&self, event: &LogEvent) -> Severity {
        self.severity.resolve(event.level())
    }

    pub fn passes_threshold(&self, stage: &str, event: &LogEvent) -> bool {
        self.passes(event, self.min_level(stage))
    }

    pub fn passes(&self, event: &LogEvent, threshold: Severity) -> bool {
        self.event_level(event).rank() >= threshold.rank()
    }

    pub fn next(&self) -> Option<LinkRef> {
        self.next.read().clone()
    }

    pub fn link(&self, next: Option<LinkRef>) {
        *self.next.write() = next;
    }

    /// Hand the event to the next link; a no-op at the end of the chain
    pub fn forward(&self, event: Option<&LogEvent>) -> Result<()> {
        match self.next() {
            Some(next) => next.handle(event),
            None => Ok(()),
        }
    }

    /// Count a sink call and absorb its error
    pub fn settle(&self, sink: &str, result: Result<()>) {
        match result {
            Ok(()) => {
                self.metrics.record_delivered();
            }
            Err(e) => {
                self.metrics.record_failed();
                eprintln!("[LOGGER ERROR] {} sink '{}' failed: {}", self.name, sink, e);
            }
        }
    }
}

impl fmt::Debug for LinkCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkCore")
            .field("name", &self.name)
            .field("severity", &self.severity)
            .field("has_next", &self.next.read().is_some())
            .field("metrics", &self.metrics)
            .finish()
    }
}
