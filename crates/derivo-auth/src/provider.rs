//! Token provider: fresh client-credentials exchange per call.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use derivo_core::config::service::ServiceConfig;
use derivo_core::types::Scope;

use crate::credentials::ClientCredentials;
use crate::error::AuthError;
use crate::token::{AccessToken, TokenResponse};

/// Path of the client-credentials authentication endpoint.
const AUTHENTICATE_PATH: &str = "/authentication/v1/authenticate";

/// Exchanges client credentials plus a requested capability set for a
/// short-lived bearer token.
///
/// Every call performs a fresh network exchange; nothing is cached. A
/// rejected exchange is surfaced immediately; retrying with the same bad
/// credentials is certain to fail again.
#[derive(Debug, Clone)]
pub struct TokenProvider {
    client: Client,
    base_url: String,
    credentials: ClientCredentials,
}

impl TokenProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: &ServiceConfig, credentials: ClientCredentials) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, config.base_url(), credentials))
    }

    /// Create a provider sharing an existing HTTP client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credentials: ClientCredentials,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Acquire a token granting the given scopes.
    ///
    /// Fails with [`AuthError::MissingCredentials`] before any network I/O
    /// when the credentials are blank, and with [`AuthError::Rejected`] when
    /// the endpoint refuses the exchange.
    pub async fn acquire(&self, scopes: &[Scope]) -> Result<AccessToken, AuthError> {
        self.credentials.validate()?;

        let scope = Scope::join(scopes);
        debug!(scope = %scope, "Requesting bearer token");

        let response = self
            .client
            .post(format!("{}{}", self.base_url, AUTHENTICATE_PATH))
            .form(&[
                ("client_id", self.credentials.client_id()),
                ("client_secret", self.credentials.client_secret()),
                ("grant_type", "client_credentials"),
                ("scope", &scope),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&body)?;
        debug!(expires_in = parsed.expires_in, "Token issued");

        Ok(AccessToken::from_response(parsed, scopes))
    }
}
