//! # Validator Configuration
//!
//! Limits applied to the transaction source.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Validation engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Upper bound on one source call, in milliseconds.
    pub fetch_timeout_ms: u64,

    /// Source calls allowed in flight at once.
    pub max_concurrent_fetches: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: 30_000,
            max_concurrent_fetches: 16,
        }
    }
}

impl ValidatorConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            fetch_timeout_ms: 2_000,
            max_concurrent_fetches: 4,
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Semaphore size. Zero would block every fetch, so it is raised to one.
    pub fn fetch_permits(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }
}
