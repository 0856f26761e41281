//! Transport engine configuration.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

const DEFAULT_MAX_REDIRECTS: u32 = 10;

/// Settings for `UreqEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whole-exchange timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub max_redirects: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl EngineConfig {
    /// Read `REQUESTS_TIMEOUT_SECS` and `REQUESTS_MAX_REDIRECTS` from the
    /// environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Values that do not parse
    /// fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            timeout_secs: parse_var(&lookup, "REQUESTS_TIMEOUT_SECS").or(defaults.timeout_secs),
            max_redirects: parse_var(&lookup, "REQUESTS_MAX_REDIRECTS")
                .unwrap_or(defaults.max_redirects),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}
