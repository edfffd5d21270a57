//! Console stage

use crate::core::prefix::render_line;
use crate::core::settings::keys;
use crate::core::{ChainConfig, ChainLink, LinkCore, LinkRef, LogEvent, LogSink, Result};
use std::sync::Arc;

/// Writes events to a terminal sink.
///
/// Switched on by `CONSOLE_LOGGING`, filtered by `MIN_LOG_LEVEL_CONSOLE` /
/// `MIN_LOG_LEVEL`. Always ready: the console needs no credentials.
pub struct ConsoleLink {
    core: LinkCore,
    sink: Arc<dyn LogSink>,
}

impl ConsoleLink {
    pub const STAGE: &'static str = "CONSOLE";

    pub fn new(config: ChainConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            core: LinkCore::new("ConsoleLink", config),
            sink,
        }
    }

    #[must_use]
    pub fn with_next(mut self, next: Option<LinkRef>) -> Self {
        self.core = self.core.with_next(next);
        self
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }
}

impl ChainLink for ConsoleLink {
    fn core(&self) -> &LinkCore {
        &self.core
    }

    fn is_ready(&self) -> Result<bool> {
        Ok(true)
    }

    fn is_enabled(&self) -> Result<bool> {
        Ok(self.core.flag(keys::CONSOLE_LOGGING))
    }

    fn process(&self, event: &LogEvent) -> Result<()> {
        if !self.core.passes_threshold(Self::STAGE, event) {
            self.core.metrics().record_filtered();
            return Ok(());
        }
        let line = render_line(event, self.core.config());
        let result = self
            .sink
            .deliver(self.core.event_level(event), &line, event.meta());
        self.core.settle(self.sink.name(), result);
        Ok(())
    }
}
