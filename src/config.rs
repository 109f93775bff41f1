use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

// Missing fields fall back to v0()
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    pub redis_url: String,
    /// Bound on every store and directory call. Zero is rejected.
    pub store_timeout_ms: u64,
    pub counter_key_prefix: String,
    pub target_key_prefix: String,
}

impl RouterConfig {
    pub fn v0() -> Self {
        Self {
            redis_url: "redis://127.0.0.1/".into(),
            store_timeout_ms: 250,
            counter_key_prefix: "accepts".into(),
            target_key_prefix: "target".into(),
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let f = std::fs::File::open(path)?;
        let config: RouterConfig = serde_json::from_reader(f)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `REDIS_URL`, `ROUTER_STORE_TIMEOUT_MS`,
    /// `ROUTER_COUNTER_PREFIX` and `ROUTER_TARGET_PREFIX`. A `.env` file is
    /// honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::v0();
        if let Some(url) = lookup("REDIS_URL") {
            config.redis_url = url;
        }
        if let Some(raw) = lookup("ROUTER_STORE_TIMEOUT_MS") {
            config.store_timeout_ms = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "ROUTER_STORE_TIMEOUT_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(prefix) = lookup("ROUTER_COUNTER_PREFIX") {
            config.counter_key_prefix = prefix;
        }
        if let Some(prefix) = lookup("ROUTER_TARGET_PREFIX") {
            config.target_key_prefix = prefix;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "store_timeout_ms",
                value: "0".into(),
            });
        }
        for (key, prefix) in [
            ("counter_key_prefix", &self.counter_key_prefix),
            ("target_key_prefix", &self.target_key_prefix),
        ] {
            if prefix.is_empty() || prefix.contains(':') {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: prefix.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::v0()
    }
}
