//! Configuration with validation.
//!
//! ```toml
//! [cache]
//! default_timeout = "5s"
//!
//! [ids]
//! ceiling = 10000
//! ```

use crate::cache::DEFAULT_TIMEOUT;
use crate::domain::DEFAULT_ID_CEILING;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable overriding `cache.default_timeout`, in milliseconds
pub const ENV_DEFAULT_TIMEOUT_MS: &str = "RAPPORT_DEFAULT_TIMEOUT_MS";
/// Environment variable overriding `ids.ceiling`
pub const ENV_ID_CEILING: &str = "RAPPORT_ID_CEILING";

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RapportConfig {
    /// Correlation cache configuration
    pub cache: CacheConfig,
    /// Request ID configuration
    pub ids: IdConfig,
}

/// Correlation cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Timeout used when a request is registered without one
    #[serde(with = "humantime_serde")]
    pub default_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Request ID configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    /// Counter value after which IDs wrap back to 1
    pub ceiling: u64,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_ID_CEILING,
        }
    }
}

impl RapportConfig {
    /// Defaults overridden by `RAPPORT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_DEFAULT_TIMEOUT_MS) {
            let millis = parse_env(ENV_DEFAULT_TIMEOUT_MS, &value)?;
            config.cache.default_timeout = Duration::from_millis(millis);
        }

        if let Some(value) = lookup(ENV_ID_CEILING) {
            config.ids.ceiling = parse_env(ENV_ID_CEILING, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.default_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "default_timeout cannot be 0".into(),
            ));
        }

        if self.ids.ceiling == 0 {
            return Err(ConfigError::InvalidIdCeiling("ceiling cannot be 0".into()));
        }

        Ok(())
    }
}

fn parse_env(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}
