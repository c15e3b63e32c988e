//! Job polling configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the translation-job polling loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between consecutive status queries, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Maximum number of status queries before the job is considered
    /// stalled. At the default interval this bounds a job to roughly ten
    /// minutes of polling.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl PollingConfig {
    /// The inter-poll delay as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval_ms() -> u64 {
    4000
}

fn default_max_attempts() -> u32 {
    150
}
