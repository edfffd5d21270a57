//! Remote log service stage

use crate::core::meta::fields;
use crate::core::prefix::render_line;
use crate::core::settings::keys;
use crate::core::{ChainConfig, ChainLink, LinkCore, LinkRef, LogEvent, LogSink, Result};
use std::sync::Arc;

/// Ships events to a remote log collector.
///
/// Only provisioned when `LOGS_TOKEN` is present; without it the link stays
/// not-ready for its whole lifetime. Switched on by `LOGENTRIES_LOGGING`,
/// filtered by `MIN_LOG_LEVEL_LOGENTRIES` / `MIN_LOG_LEVEL`. The `notify`
/// field is dropped from shipped metadata.
pub struct RemoteLogLink {
    core: LinkCore,
    sink: Option<Arc<dyn LogSink>>,
}

impl RemoteLogLink {
    pub const STAGE: &'static str = "LOGENTRIES";

    /// `provision` receives the delivery token and is only called when one
    /// is configured.
    pub fn new<F>(config: ChainConfig, provision: F) -> Self
    where
        F: FnOnce(&str) -> Arc<dyn LogSink>,
    {
        let sink = match config.token(keys::LOGS_TOKEN) {
            Some(token) => Some(provision(token)),
            None => {
                eprintln!("[LOGGER WARNING] Logentries logging was not initialized due to a missing token");
                None
            }
        };
        Self {
            core: LinkCore::new("RemoteLogLink", config),
            sink,
        }
    }

    #[must_use]
    pub fn with_next(mut self, next: Option<LinkRef>) -> Self {
        self.core = self.core.with_next(next);
        self
    }

    pub fn sink(&self) -> Option<&Arc<dyn LogSink>> {
        self.sink.as_ref()
    }
}

impl ChainLink for RemoteLogLink {
    fn core(&self) -> &LinkCore {
        &self.core
    }

    fn is_ready(&self) -> Result<bool> {
        Ok(self.sink.is_some())
    }

    fn is_enabled(&self) -> Result<bool> {
        Ok(self.core.flag(keys::LOGENTRIES_LOGGING))
    }

    fn process(&self, event: &LogEvent) -> Result<()> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };
        if !self.core.passes_threshold(Self::STAGE, event) {
            self.core.metrics().record_filtered();
            return Ok(());
        }
        let line = render_line(event, self.core.config());
        let meta = event.meta().without(fields::NOTIFY);
        let result = sink.deliver(self.core.event_level(event), &line, &meta);
        self.core.settle(sink.name(), result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Environment, MapEnv, Settings};
    use crate::sinks::CaptureSink;

    const TOKEN: &str = "00000000-0000-0000-0000-000000000000";

    fn setup(settings: Settings) -> (Arc<MapEnv>, Arc<CaptureSink>, RemoteLogLink) {
        let env = Arc::new(MapEnv::new());
        let config = ChainConfig::new(settings, Arc::clone(&env) as Arc<dyn Environment>);
        let sink = Arc::new(CaptureSink::new("capture"));
        let provided = sink.clone();
        let link = RemoteLogLink::new(config, move |_| provided as Arc<dyn LogSink>);
        (env, sink, link)
    }

    fn event(link: &RemoteLogLink, level: &str) -> LogEvent {
        LogEvent::pack(link.core().config(), level, "shipped", &[])
    }

    #[test]
    fn test_not_ready_without_token() {
        let (_, sink, link) = setup(Settings::new().with(keys::LOGENTRIES_LOGGING, true));
        assert!(!link.is_ready().unwrap());
        assert!(link.sink().is_none());

        link.handle(Some(&event(&link, "error"))).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_provision_receives_token() {
        let env = Arc::new(MapEnv::new());
        let config = ChainConfig::new(
            Settings::new().with(keys::LOGS_TOKEN, TOKEN),
            env as Arc<dyn Environment>,
        );
        let mut seen = None;
        let _link = RemoteLogLink::new(config, |token| {
            seen = Some(token.to_string());
            Arc::new(CaptureSink::new("capture")) as Arc<dyn LogSink>
        });
        assert_eq!(seen.as_deref(), Some(TOKEN));
    }

    #[test]
    fn test_ships_without_notify() {
        let (_, sink, link) = setup(
            Settings::new()
                .with(keys::LOGS_TOKEN, TOKEN)
                .with(keys::LOGENTRIES_LOGGING, true),
        );
        assert!(link.is_ready().unwrap());

        link.handle(Some(&event(&link, "info"))).unwrap();

        let captured = sink.captured();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].text, "shipped");
        assert!(!captured[0].meta.contains("notify"));
        assert!(captured[0].meta.contains("instanceId"));
    }

    #[test]
    fn test_env_disables() {
        let (env, sink, link) = setup(
            Settings::new()
                .with(keys::LOGS_TOKEN, TOKEN)
                .with(keys::LOGENTRIES_LOGGING, true),
        );
        env.set(keys::LOGENTRIES_LOGGING, "false");

        link.handle(Some(&event(&link, "error"))).unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_stage_threshold_beats_global() {
        let (env, sink, link) = setup(
            Settings::new()
                .with(keys::LOGS_TOKEN, TOKEN)
                .with(keys::LOGENTRIES_LOGGING, true),
        );
        env.set(keys::MIN_LOG_LEVEL, "error");
        env.set("MIN_LOG_LEVEL_LOGENTRIES", "warn");

        link.handle(Some(&event(&link, "info"))).unwrap();
        link.handle(Some(&event(&link, "warn"))).unwrap();
        link.handle(Some(&event(&link, "error"))).unwrap();

        assert_eq!(sink.len(), 2);
    }
}
