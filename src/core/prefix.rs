//! Line prefix rendering
//!
//! Each part of the prefix is switched on by its own flag (`LOG_TIMESTAMP`,
//! `LOG_ENVIRONMENT`, `LOG_LEVEL`, `LOG_REQID`), resolved like every other
//! flag: environment `true`/`false` first, then settings. The request id is
//! only rendered when the event carries one.

use super::config::ChainConfig;
use super::log_event::LogEvent;
use super::settings::keys;
use chrono::{DateTime, Utc};

/// Environment name used when `APP_ENV` is unset
pub const DEFAULT_ENVIRONMENT: &str = "local";

/// Render `[<parts>] `, or an empty string when no part is enabled
pub fn render_prefix(event: &LogEvent, config: &ChainConfig) -> String {
    render_prefix_at(event, config, Utc::now())
}

pub fn render_prefix_at(event: &LogEvent, config: &ChainConfig, now: DateTime<Utc>) -> String {
    let mut prefix = String::new();

    if config.flag(keys::LOG_TIMESTAMP) {
        prefix.push_str(&now.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
        prefix.push(':');
    }
    if config.flag(keys::LOG_ENVIRONMENT) {
        let environment = config
            .env_var(keys::APP_ENV)
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        prefix.push_str(&environment);
        prefix.push(':');
    }
    if config.flag(keys::LOG_LEVEL) {
        prefix.push_str(&event.level().to_uppercase());
        prefix.push(':');
    }
    if let Some(req_id) = event.meta().req_id() {
        if config.flag(keys::LOG_REQID) {
            prefix.push_str(&req_id.to_string());
        }
    }

    if prefix.is_empty() {
        String::new()
    } else {
        format!("[{}] ", prefix)
    }
}

/// `[<scope>] `, or an empty string without a scope
pub fn render_scope(event: &LogEvent) -> String {
    event
        .meta()
        .scope()
        .map(|scope| format!("[{}] ", scope))
        .unwrap_or_default()
}

/// Prefix, scope and text, ready for a sink
pub fn render_line(event: &LogEvent, config: &ChainConfig) -> String {
    format!(
        "{}{}{}",
        render_prefix(event, config),
        render_scope(event),
        event.text()
    )
}
