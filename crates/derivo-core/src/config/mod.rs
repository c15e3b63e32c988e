//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod polling;
pub mod service;

use serde::{Deserialize, Serialize};

use self::logging::LoggingConfig;
use self::polling::PollingConfig;
use self::service::ServiceConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay) and
/// `DERIVO__`-prefixed environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote conversion-service endpoints and timeouts.
    pub service: ServiceConfig,
    /// Caller-supplied client credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Job polling settings.
    #[serde(default)]
    pub polling: PollingConfig,
    /// Artifact output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client credentials for the remote service.
///
/// Both values are opaque secrets supplied by the caller; they are never
/// persisted by Derivo. Typically provided via `DERIVO__CREDENTIALS__*`
/// environment variables rather than the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Client identifier issued by the remote service.
    #[serde(default)]
    pub client_id: String,
    /// Client secret issued by the remote service.
    #[serde(default)]
    pub client_secret: String,
}

/// Artifact output configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory root. When unset, artifacts land in a directory
    /// named after the content identifier, next to the input file.
    #[serde(default)]
    pub directory: Option<String>,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DERIVO__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DERIVO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "service": { "base_url": "https://developer.api.example.com" }
        }))
        .expect("deserialize");

        assert_eq!(cfg.polling.interval_ms, 4000);
        assert_eq!(cfg.polling.max_attempts, 150);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.output.directory.is_none());
        assert!(cfg.credentials.client_id.is_empty());
    }
}
