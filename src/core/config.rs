//! Environment-over-settings configuration resolution

use super::environment::{Environment, ProcessEnv};
use super::settings::{keys, Settings};
use std::fmt;
use std::sync::Arc;

/// Settings plus the environment that overrides them.
///
/// Cheap to clone; every chain link holds its own copy of the same shared
/// state.
#[derive(Clone)]
pub struct ChainConfig {
    settings: Arc<Settings>,
    env: Arc<dyn Environment>,
}

impl ChainConfig {
    pub fn new(settings: Settings, env: Arc<dyn Environment>) -> Self {
        Self {
            settings: Arc::new(settings),
            env,
        }
    }

    /// Settings overridden by the process environment
    pub fn from_process(settings: Settings) -> Self {
        Self::new(settings, Arc::new(ProcessEnv))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn env(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    /// Raw environment value
    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    /// Feature flag: an environment value of exactly `true` or `false` wins,
    /// otherwise the settings value coerced to bool, otherwise `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.env.var(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => self.settings.flag(key),
        }
    }

    /// Non-empty value for `key`, environment first, then settings text.
    /// Not validated; endpoints, release stages and level tokens all come
    /// through here.
    pub fn value(&self, key: &str) -> Option<String> {
        self.env
            .var(key)
            .filter(|v| !v.is_empty())
            .or_else(|| {
                self.settings
                    .text(key)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            })
    }

    /// First value present across `sources`, each checked environment first,
    /// then settings. Later sources are never consulted once one holds a
    /// value, even if that value turns out to be unusable.
    pub fn first_value(&self, sources: &[&str]) -> Option<String> {
        sources.iter().find_map(|key| self.value(key))
    }

    /// Delivery token; read from settings only
    pub fn token(&self, key: &str) -> Option<&str> {
        self.settings.text(key).filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for ChainConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainConfig")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::from_process(Settings::new())
    }
}

/// Seed delivery tokens from the environment, caller settings winning
pub fn seed_tokens(settings: Settings, env: &dyn Environment) -> Settings {
    let mut seeded = Settings::new();
    let first = |a: &str, b: &str| env.var(a).or_else(|| env.var(b)).filter(|t| !t.is_empty());

    if let Some(token) = first(keys::LOGS_TOKEN, keys::LOGENTRIES_TOKEN) {
        seeded.insert(keys::LOGS_TOKEN, token);
    }
    if let Some(token) = first(keys::BUGS_TOKEN, keys::BUGSNAG_TOKEN) {
        seeded.insert(keys::BUGS_TOKEN, token);
    }
    seeded.merged(&settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::environment::MapEnv;

    fn config(settings: Settings, env: &Arc<MapEnv>) -> ChainConfig {
        ChainConfig::new(settings, Arc::clone(env) as Arc<dyn Environment>)
    }

    #[test]
    fn test_flag_env_overrides_settings() {
        let env = Arc::new(MapEnv::new());
        let config = config(Settings::new().with(keys::BUGSNAG_LOGGING, true), &env);
        assert!(config.flag(keys::BUGSNAG_LOGGING));

        env.set(keys::BUGSNAG_LOGGING, "false");
        assert!(!config.flag(keys::BUGSNAG_LOGGING));

        // not a boolean token, settings win again
        env.set(keys::BUGSNAG_LOGGING, "undefined");
        assert!(config.flag(keys::BUGSNAG_LOGGING));

        env.remove(keys::BUGSNAG_LOGGING);
        assert!(config.flag(keys::BUGSNAG_LOGGING));
    }

    #[test]
    fn test_flag_defaults_to_false() {
        let env = Arc::new(MapEnv::new());
        let config = config(Settings::new(), &env);
        assert!(!config.flag(keys::CONSOLE_LOGGING));

        env.set(keys::CONSOLE_LOGGING, "true");
        assert!(config.flag(keys::CONSOLE_LOGGING));
    }

    #[test]
    fn test_first_value_stops_at_first_present_source() {
        let env = Arc::new(MapEnv::new().with_var("MIN_LOG_LEVEL_CONSOLE", "warnn"));
        let config = config(
            Settings::new()
                .with("MIN_LOG_LEVEL_CONSOLE", "debug")
                .with(keys::MIN_LOG_LEVEL, "error"),
            &env,
        );
        let sources = ["MIN_LOG_LEVEL_CONSOLE", keys::MIN_LOG_LEVEL];

        // returned as-is, even though it is not a level
        assert_eq!(config.first_value(&sources).as_deref(), Some("warnn"));

        env.set("MIN_LOG_LEVEL_CONSOLE", "");
        assert_eq!(config.first_value(&sources).as_deref(), Some("debug"));

        assert_eq!(config.first_value(&["MIN_LOG_LEVEL_OTHER"]), None);
    }

    #[test]
    fn test_value_env_first() {
        let env = Arc::new(MapEnv::new());
        let config = config(Settings::new().with(keys::LOGS_ENDPOINT, "settings:10000"), &env);
        assert_eq!(config.value(keys::LOGS_ENDPOINT).as_deref(), Some("settings:10000"));

        env.set(keys::LOGS_ENDPOINT, "env:10000");
        assert_eq!(config.value(keys::LOGS_ENDPOINT).as_deref(), Some("env:10000"));

        assert_eq!(config.value(keys::BUGS_ENDPOINT), None);
    }

    #[test]
    fn test_seed_tokens() {
        let env = MapEnv::new()
            .with_var(keys::LOGENTRIES_TOKEN, "le-token")
            .with_var(keys::BUGS_TOKEN, "env-bugs");
        let settings = seed_tokens(Settings::new().with(keys::BUGS_TOKEN, "caller-bugs"), &env);

        assert_eq!(settings.text(keys::LOGS_TOKEN), Some("le-token"));
        assert_eq!(settings.text(keys::BUGS_TOKEN), Some("caller-bugs"));
    }
}
