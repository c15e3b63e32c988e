//! Remote conversion-service configuration.

use serde::{Deserialize, Serialize};

/// Remote service endpoints and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the remote service, without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds for control-plane calls (auth, bucket
    /// creation, job submission, status polls).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Request timeout in seconds for data-plane transfers (object upload,
    /// derivative and thumbnail downloads).
    #[serde(default = "default_transfer_timeout")]
    pub transfer_timeout_seconds: u64,
}

impl ServiceConfig {
    /// The base URL with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

fn default_request_timeout() -> u64 {
    30
}

fn default_transfer_timeout() -> u64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let cfg = ServiceConfig {
            base_url: "https://api.example.com/".to_string(),
            request_timeout_seconds: 30,
            transfer_timeout_seconds: 300,
        };
        assert_eq!(cfg.base_url(), "https://api.example.com");
    }
}
