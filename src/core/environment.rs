//! Process environment lookup
//!
//! Every configuration key can be overridden from the environment. Lookups go
//! through the [`Environment`] trait so a pipeline can be pointed at the real
//! process environment or at an in-memory map.

use parking_lot::RwLock;
use std::collections::HashMap;

pub trait Environment: Send + Sync {
    /// Value of the variable, `None` when unset or not valid unicode
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads `std::env`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory environment, mutable after the pipeline is built
///
/// # Example
///
/// ```
/// use rust_log_chain::core::{Environment, MapEnv};
///
/// let env = MapEnv::new().with_var("CONSOLE_LOGGING", "true");
/// assert_eq!(env.var("CONSOLE_LOGGING").as_deref(), Some("true"));
///
/// env.remove("CONSOLE_LOGGING");
/// assert_eq!(env.var("CONSOLE_LOGGING"), None);
/// ```
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: RwLock<HashMap<String, String>>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.vars.write().remove(key);
    }

    pub fn clear(&self) {
        self.vars.write().clear();
    }
}

impl Environment for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.read().get(key).cloned()
    }
}
