//! Settings: environment-driven configuration shared by every command.
use std::time::Duration;

use crate::error::{PpiError, Result};

pub const DEFAULT_ELASTICSEARCH_HOST: &str = "http://localhost:9200";
pub const DEFAULT_INDEX: &str = "profanity-power-index";
pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub elasticsearch_host: String,
    pub elasticsearch_index: String,
    pub request_timeout: Duration,
    pub listen_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            elasticsearch_host: DEFAULT_ELASTICSEARCH_HOST.to_string(),
            elasticsearch_index: DEFAULT_INDEX.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            listen_addr: DEFAULT_ADDR.to_string(),
        }
    }
}

/// Loads `.env` into the process environment if one is found. Existing
/// variables win.
pub fn load_dotenv() {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded environment from {}", path.display());
    }
}

impl Settings {
    /// Loads `.env` (if any) and then reads the process environment.
    pub fn from_env() -> Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = match non_empty("ELASTICSEARCH_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| {
                    PpiError::Config(format!("ELASTICSEARCH_TIMEOUT_SECS='{}': {}", raw, e))
                })?,
            None => defaults.request_timeout,
        };

        Ok(Self {
            elasticsearch_host: non_empty("ELASTICSEARCH_HOST").unwrap_or(defaults.elasticsearch_host),
            elasticsearch_index: non_empty("ELASTICSEARCH_INDEX").unwrap_or(defaults.elasticsearch_index),
            request_timeout,
            listen_addr: non_empty("PPI_ADDR").unwrap_or(defaults.listen_addr),
        })
    }
}
