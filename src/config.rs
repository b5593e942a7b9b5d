// src/config.rs
//! Guard configuration
//!
//! The persisted configuration store is an external collaborator; this module
//! only defines the shape the guard reads and a JSON loader for the replay
//! binary and embedders that keep their config on disk.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::registry::{default_browsers, BrowserConfig};

/// Everything the pipeline needs at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Restricted-address prefix; empty means no restriction is configured.
    pub restricted_prefix: String,

    /// Safe destination for redirects. Stored without a scheme; the redirect
    /// action prepends `https://` when issuing the command.
    pub fallback_address: String,

    /// Minimum quiet period between two accepted actions for the same
    /// (package, address) pair, in event-clock milliseconds.
    pub cooldown_ms: u64,

    /// Upper bound on tracked (package, address) pairs before the oldest are
    /// evicted.
    pub throttle_capacity: usize,

    /// Supported browser layouts; first entry wins on duplicates.
    pub browsers: Vec<BrowserConfig>,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            restricted_prefix: String::new(),
            fallback_address: "www.404.net".to_string(),
            cooldown_ms: 2000,
            throttle_capacity: 1024,
            browsers: default_browsers(),
        }
    }
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GuardConfig {
    /// Load from a JSON file; absent fields fall back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
