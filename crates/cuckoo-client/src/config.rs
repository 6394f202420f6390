//! Client configuration with validation.
//!
//! Values come from defaults, environment variables, or a JSON file.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Default time (seconds) to wait for a response from the Cuckoo service.
pub const DEFAULT_RESPONSE_TIMEOUT_SECS: u64 = 30;

/// Smallest accepted response timeout (seconds).
///
/// Earlier releases enforced a 300 s floor alongside the 30 s default, so the
/// default could never be set back once changed. The floor now sits below
/// the default. Deployments that relied on 300 can set
/// `min_response_timeout_secs: 300`, provided `response_timeout_secs` is
/// raised to at least 300 too ([`ClientConfig::validate`] rejects anything
/// else).
pub const MIN_RESPONSE_TIMEOUT_SECS: u64 = 5;

/// Environment variable overriding the response timeout.
pub const ENV_RESPONSE_TIMEOUT: &str = "CUCKOO_RESPONSE_TIMEOUT_SECS";

/// Environment variable overriding the minimum response timeout.
pub const ENV_MIN_RESPONSE_TIMEOUT: &str = "CUCKOO_MIN_RESPONSE_TIMEOUT_SECS";

/// Cuckoo client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Initial response timeout in seconds.
    pub response_timeout_secs: u64,
    /// Lower bound enforced by `CuckooClient::set_response_timeout`.
    pub min_response_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: DEFAULT_RESPONSE_TIMEOUT_SECS,
            min_response_timeout_secs: MIN_RESPONSE_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CUCKOO_RESPONSE_TIMEOUT_SECS`: Response timeout (default: 30)
    /// - `CUCKOO_MIN_RESPONSE_TIMEOUT_SECS`: Minimum response timeout (default: 5)
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            response_timeout_secs: secs(ENV_RESPONSE_TIMEOUT, defaults.response_timeout_secs),
            min_response_timeout_secs: secs(
                ENV_MIN_RESPONSE_TIMEOUT,
                defaults.min_response_timeout_secs,
            ),
        }
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_response_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "min_response_timeout_secs cannot be 0".into(),
            ));
        }

        if self.response_timeout_secs < self.min_response_timeout_secs {
            return Err(ConfigError::InvalidTimeout(format!(
                "response_timeout_secs ({}) is below min_response_timeout_secs ({})",
                self.response_timeout_secs, self.min_response_timeout_secs
            )));
        }

        Ok(())
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_secs)
    }

    pub fn min_response_timeout(&self) -> Duration {
        Duration::from_secs(self.min_response_timeout_secs)
    }
}
