//! Error notification stage

use crate::core::settings::keys;
use crate::core::{
    ChainConfig, ChainLink, ErrorSink, LinkCore, LinkRef, LogEvent, Notification, Result, Severity,
};
use std::sync::Arc;

/// Sends events to an error-notification service.
///
/// Only provisioned when `BUGS_TOKEN` is present. Switched on by
/// `BUGSNAG_LOGGING` and filtered by `MIN_LOG_LEVEL_BUGSNAG` /
/// `MIN_LOG_LEVEL`, unless a fixed floor is set. Each event can opt out with
/// `notify: false`; a `notify` that is missing or not a boolean follows the
/// stage's own enablement.
pub struct ErrorNotifierLink {
    core: LinkCore,
    notifier: Option<Arc<dyn ErrorSink>>,
    floor: Option<Severity>,
}

impl ErrorNotifierLink {
    pub const STAGE: &'static str = "BUGSNAG";

    /// `provision` receives the delivery token and is only called when one
    /// is configured.
    pub fn new<F>(config: ChainConfig, provision: F) -> Self
    where
        F: FnOnce(&str) -> Arc<dyn ErrorSink>,
    {
        let notifier = match config.token(keys::BUGS_TOKEN) {
            Some(token) => Some(provision(token)),
            None => {
                eprintln!("[LOGGER WARNING] Bugsnag logging was not initialized due to a missing token");
                None
            }
        };
        Self::with_sink(config, notifier)
    }

    /// Wrap a sink provisioned elsewhere. `None` gives a link that is never
    /// ready; no warning is printed for it.
    pub fn with_sink(config: ChainConfig, notifier: Option<Arc<dyn ErrorSink>>) -> Self {
        Self {
            core: LinkCore::new("ErrorNotifierLink", config),
            notifier,
            floor: None,
        }
    }

    #[must_use]
    pub fn with_next(mut self, next: Option<LinkRef>) -> Self {
        self.core = self.core.with_next(next);
        self
    }

    /// Use a hardcoded threshold instead of the configured one
    #[must_use]
    pub fn with_fixed_floor(mut self, floor: Severity) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn fixed_floor(&self) -> Option<Severity> {
        self.floor
    }

    pub fn notifier(&self) -> Option<&Arc<dyn ErrorSink>> {
        self.notifier.as_ref()
    }

    pub fn threshold(&self) -> Severity {
        self.floor
            .unwrap_or_else(|| self.core.min_level(Self::STAGE))
    }
}

impl ChainLink for ErrorNotifierLink {
    fn core(&self) -> &LinkCore {
        &self.core
    }

    fn is_ready(&self) -> Result<bool> {
        Ok(self.notifier.is_some())
    }

    fn is_enabled(&self) -> Result<bool> {
        Ok(self.core.flag(keys::BUGSNAG_LOGGING))
    }

    fn process(&self, event: &LogEvent) -> Result<()> {
        let Some(notifier) = &self.notifier else {
            return Ok(());
        };
        let notify = match event.meta().notify() {
            Some(notify) => notify,
            None => self.is_enabled()?,
        };
        if !notify || !self.core.passes(event, self.threshold()) {
            self.core.metrics().record_filtered();
            return Ok(());
        }

        let notification = match event.meta().stack() {
            Some(stack) => Notification::Error {
                message: event.text(),
                stack,
            },
            None => Notification::Text(event.text()),
        };
        let result = notifier.notify_error(self.core.event_level(event), notification, event.meta());
        self.core.settle(notifier.name(), result);
        Ok(())
    }
}
