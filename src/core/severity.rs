//! Severity levels and threshold comparison

use super::config::ChainConfig;
use super::settings::keys;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token that resolves to the configured default level
pub const DEFAULT_TOKEN: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Silly = 0,
    Verbose = 1,
    Debug = 2,
    #[default]
    Info = 3,
    Warn = 4,
    Error = 5,
}

impl Severity {
    /// All levels in ascending order
    pub const ALL: [Severity; 6] = [
        Severity::Silly,
        Severity::Verbose,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Silly => "silly",
            Severity::Verbose => "verbose",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    #[inline]
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Parse a known level token, `None` for anything else (including `default`).
    ///
    /// Exact match only: `ERROR`, ` info ` and `warning` are not levels.
    pub fn parse_known(token: &str) -> Option<Self> {
        token.parse().ok()
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            Severity::Silly => BrightBlack,
            Severity::Verbose => Cyan,
            Severity::Debug => Blue,
            Severity::Info => Green,
            Severity::Warn => Yellow,
            Severity::Error => Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "silly" => Ok(Severity::Silly),
            "verbose" => Ok(Severity::Verbose),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Rank table plus the resolved fallback level of one chain link.
///
/// Any token that is not a known level (typos, empty strings, the `default`
/// pseudo-level) resolves to the fallback before comparison, so resolution
/// never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityModel {
    default_level: Severity,
}

impl SeverityModel {
    pub fn new(default_level: Severity) -> Self {
        Self { default_level }
    }

    /// Resolve the fallback level from `DEFAULT_LOG_LEVEL` (environment, then
    /// settings), falling back to `info`.
    ///
    /// A configured token that is not a known level is normalized to `info`
    /// with a warning.
    pub fn from_config(config: &ChainConfig) -> Self {
        let configured = config.value(keys::DEFAULT_LOG_LEVEL);
        let default_level = match configured.as_deref() {
            None => Severity::Info,
            Some(token) => match Severity::parse_known(token) {
                Some(level) => level,
                None => {
                    eprintln!(
                        "[LOGGER WARNING] Unknown {} '{}', falling back to '{}'",
                        keys::DEFAULT_LOG_LEVEL,
                        token,
                        Severity::Info
                    );
                    Severity::Info
                }
            },
        };
        Self::new(default_level)
    }

    #[inline]
    pub fn default_level(&self) -> Severity {
        self.default_level
    }

    #[inline]
    pub fn rank(&self, token: &str) -> u8 {
        self.resolve(token).rank()
    }

    pub fn resolve(&self, token: &str) -> Severity {
        Severity::parse_known(token).unwrap_or(self.default_level)
    }

    /// Is `level` at least as severe as `threshold`?
    pub fn compare(&self, level: &str, threshold: &str) -> bool {
        self.rank(level) >= self.rank(threshold)
    }
}

impl Default for SeverityModel {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_are_ascending() {
        let ranks: Vec<u8> = Severity::ALL.iter().map(Severity::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("ERROR".parse::<Severity>().is_err());
        assert!("Warning".parse::<Severity>().is_err());
        assert!("warning".parse::<Severity>().is_err());
        assert!(" info ".parse::<Severity>().is_err());
        assert!("default".parse::<Severity>().is_err());
        assert!("infoo".parse::<Severity>().is_err());
    }

    #[test]
    fn test_case_variants_resolve_to_default() {
        let model = SeverityModel::default();
        assert_eq!(model.resolve("ERROR"), Severity::Info);
        assert_eq!(model.resolve(" error "), Severity::Info);
        assert_eq!(model.resolve("warning"), Severity::Info);
        assert!(!model.compare("ERROR", "warn"));

        let model = SeverityModel::new(Severity::Debug);
        assert_eq!(model.resolve("Warn"), model.resolve(DEFAULT_TOKEN));
    }

    #[test]
    fn test_unknown_tokens_resolve_to_default() {
        let model = SeverityModel::default();
        assert_eq!(model.resolve("infoo"), Severity::Info);
        assert_eq!(model.resolve(""), Severity::Info);
        assert_eq!(model.resolve(DEFAULT_TOKEN), Severity::Info);

        let model = SeverityModel::new(Severity::Warn);
        assert_eq!(model.resolve("nope"), Severity::Warn);
        assert_eq!(model.resolve("debug"), Severity::Debug);
    }

    #[test]
    fn test_compare() {
        let model = SeverityModel::default();
        assert!(model.compare("error", "warn"));
        assert!(model.compare("warn", "warn"));
        assert!(!model.compare("info", "warn"));
        // typo resolves to info before comparing
        assert!(model.compare("errr", "info"));
        assert!(!model.compare("errr", "warn"));
    }

    #[test]
    fn test_display_matches_token() {
        for level in Severity::ALL {
            assert_eq!(level.to_string().parse::<Severity>(), Ok(level));
        }
    }
}
