//! TOML configuration for queue pools
//!
//! Configuration is read from a `[pool]` table; every key is optional and
//! falls back to its default.
//!
//! ```toml
//! [pool]
//! size = 100
//! join_timeout_ms = 5000
//! join_poll_interval_ms = 100
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default capacity applied to every queue in a pool
pub const DEFAULT_POOL_SIZE: usize = 100;

/// Default upper bound on how long `QueuePool::join` waits for queues to drain
pub const DEFAULT_JOIN_TIMEOUT_MS: u64 = 5000;

/// Default delay between drain checks in `QueuePool::join`
pub const DEFAULT_JOIN_POLL_INTERVAL_MS: u64 = 100;

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

/// Settings for a [`QueuePool`](crate::queue::QueuePool)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Capacity of every queue the pool creates, system queues included
    pub size: usize,
    /// Drain-wait budget for `join`
    pub join_timeout_ms: u64,
    /// Poll interval for `join`
    pub join_poll_interval_ms: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_POOL_SIZE,
            join_timeout_ms: DEFAULT_JOIN_TIMEOUT_MS,
            join_poll_interval_ms: DEFAULT_JOIN_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    pool: PoolConfig,
}

impl PoolConfig {
    /// Default configuration with a specific queue capacity
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Parse the `[pool]` table out of a TOML document and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(contents)?;
        file.pool.validate()?;
        Ok(file.pool)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded pool configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Default configuration file location, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("flowqueue").join("flowqueue.toml"))
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(ConfigError::Invalid {
                message: "pool size must be a positive integer".to_string(),
            });
        }
        if self.join_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "join_timeout_ms must be a positive integer".to_string(),
            });
        }
        if self.join_poll_interval_ms == 0 || self.join_poll_interval_ms > self.join_timeout_ms {
            return Err(ConfigError::Invalid {
                message: format!(
                    "join_poll_interval_ms must be between 1 and join_timeout_ms ({})",
                    self.join_timeout_ms
                ),
            });
        }
        Ok(())
    }

    pub fn join_timeout(&self) -> Duration {
        Duration::from_millis(self.join_timeout_ms)
    }

    pub fn join_poll_interval(&self) -> Duration {
        Duration::from_millis(self.join_poll_interval_ms)
    }
}
