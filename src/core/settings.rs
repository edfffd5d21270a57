//! Flat settings mapping supplied once at pipeline construction

use super::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Recognized configuration keys
///
/// The same names are used for environment variables and settings entries.
pub mod keys {
    pub const CONSOLE_LOGGING: &str = "CONSOLE_LOGGING";
    pub const LOGENTRIES_LOGGING: &str = "LOGENTRIES_LOGGING";
    pub const BUGSNAG_LOGGING: &str = "BUGSNAG_LOGGING";

    pub const MIN_LOG_LEVEL: &str = "MIN_LOG_LEVEL";
    pub const DEFAULT_LOG_LEVEL: &str = "DEFAULT_LOG_LEVEL";

    pub const LOGS_TOKEN: &str = "LOGS_TOKEN";
    pub const BUGS_TOKEN: &str = "BUGS_TOKEN";
    pub const LOGS_ENDPOINT: &str = "LOGS_ENDPOINT";
    pub const BUGS_ENDPOINT: &str = "BUGS_ENDPOINT";

    pub const LOG_TIMESTAMP: &str = "LOG_TIMESTAMP";
    pub const LOG_ENVIRONMENT: &str = "LOG_ENVIRONMENT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const LOG_REQID: &str = "LOG_REQID";

    // environment only
    pub const LOGENTRIES_TOKEN: &str = "LOGENTRIES_TOKEN";
    pub const BUGSNAG_TOKEN: &str = "BUGSNAG_TOKEN";
    pub const HOSTNAME: &str = "HOSTNAME";
    pub const APP_ENV: &str = "APP_ENV";

    /// `MIN_LOG_LEVEL_<STAGE>`
    pub fn stage_min_level(stage: &str) -> String {
        format!("{}_{}", MIN_LOG_LEVEL, stage)
    }
}

/// A single settings value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl SettingValue {
    /// Boolean coercion used for feature flags.
    ///
    /// Text is true unless it is empty or the literal `false`; numbers are
    /// true unless zero.
    pub fn as_flag(&self) -> bool {
        match self {
            SettingValue::Bool(b) => *b,
            SettingValue::Number(n) => *n != 0.0,
            SettingValue::Text(s) => !(s.is_empty() || s.eq_ignore_ascii_case("false")),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Number(n) => write!(f, "{}", n),
            SettingValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::Text(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::Text(s)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Number(n as f64)
    }
}

impl From<i32> for SettingValue {
    fn from(n: i32) -> Self {
        SettingValue::Number(f64::from(n))
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

/// Flat key/value configuration
///
/// # Example
///
/// ```
/// use rust_log_chain::core::Settings;
///
/// let settings = Settings::new()
///     .with("CONSOLE_LOGGING", true)
///     .with("MIN_LOG_LEVEL", "warn");
///
/// assert!(settings.flag("CONSOLE_LOGGING"));
/// assert_eq!(settings.text("MIN_LOG_LEVEL"), Some("warn"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, SettingValue>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a flat JSON object
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(ChainError::config("Settings", "expected a JSON object"));
        }
        let mut settings = Settings::new();
        if let serde_json::Value::Object(map) = value {
            for (key, value) in map {
                let value = match value {
                    serde_json::Value::Null => continue,
                    serde_json::Value::Bool(b) => SettingValue::Bool(b),
                    serde_json::Value::Number(n) => SettingValue::Number(n.as_f64().unwrap_or(0.0)),
                    serde_json::Value::String(s) => SettingValue::Text(s),
                    other => {
                        return Err(ChainError::config(
                            "Settings",
                            format!("value of '{}' must be a scalar, got {}", key, other),
                        ))
                    }
                };
                settings.values.insert(key, value);
            }
        }
        Ok(settings)
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Text value, `None` for missing or non-text entries
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SettingValue::as_text)
    }

    /// Boolean-coerced value, `false` when missing
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(SettingValue::as_flag)
    }

    /// Overlay `other` on top of `self`, `other` winning on conflicts
    pub fn merged(mut self, other: &Settings) -> Self {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_coercion() {
        let settings = Settings::new()
            .with("A", true)
            .with("B", false)
            .with("C", "true")
            .with("D", "false")
            .with("E", "")
            .with("F", 1)
            .with("G", 0);

        assert!(settings.flag("A"));
        assert!(!settings.flag("B"));
        assert!(settings.flag("C"));
        assert!(!settings.flag("D"));
        assert!(!settings.flag("E"));
        assert!(settings.flag("F"));
        assert!(!settings.flag("G"));
        assert!(!settings.flag("MISSING"));
    }

    #[test]
    fn test_from_json() -> Result<()> {
        let settings = Settings::from_json(
            r#"{"CONSOLE_LOGGING": true, "MIN_LOG_LEVEL": "warn", "PORT": 8080, "SKIPPED": null}"#,
        )?;

        assert!(settings.flag(keys::CONSOLE_LOGGING));
        assert_eq!(settings.text(keys::MIN_LOG_LEVEL), Some("warn"));
        assert_eq!(settings.get("PORT"), Some(&SettingValue::Number(8080.0)));
        assert!(!settings.contains("SKIPPED"));
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = Settings::from_json("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, ChainError::InvalidConfiguration { .. }));

        let err = Settings::from_json(r#"{"NESTED": {"a": 1}}"#).unwrap_err();
        assert!(err.to_string().contains("NESTED"));
    }

    #[test]
    fn test_merged_overrides() {
        let base = Settings::new().with(keys::LOGS_TOKEN, "from-env").with("A", 1);
        let caller = Settings::new().with(keys::LOGS_TOKEN, "from-caller");

        let merged = base.merged(&caller);
        assert_eq!(merged.text(keys::LOGS_TOKEN), Some("from-caller"));
        assert!(merged.flag("A"));
    }

    #[test]
    fn test_stage_key() {
        assert_eq!(keys::stage_min_level("CONSOLE"), "MIN_LOG_LEVEL_CONSOLE");
    }
}
