//! Bearer token model.

use serde::{Deserialize, Serialize};

use derivo_core::types::Scope;

/// Raw token payload returned by the authentication endpoint.
///
/// Unknown fields are ignored; only the fields the pipeline consumes are
/// modeled.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// A short-lived bearer token with the scopes it was requested for.
///
/// Tokens are acquired per operation and never cached; expiry is the remote
/// service's concern, not the orchestrator's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Opaque bearer value.
    pub access_token: String,
    /// Token type as reported by the endpoint (always `Bearer` in practice).
    pub token_type: String,
    /// Validity window in seconds from issuance.
    pub expires_in: u64,
    /// The capability set the token was requested with.
    pub scopes: Vec<Scope>,
}

impl AccessToken {
    pub(crate) fn from_response(response: TokenResponse, scopes: &[Scope]) -> Self {
        Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            scopes: scopes.to_vec(),
        }
    }

    /// The bearer value, as passed to `Authorization: Bearer` headers.
    pub fn bearer(&self) -> &str {
        &self.access_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_tolerates_unknown_fields() {
        let response: TokenResponse = serde_json::from_str(
            r#"{"access_token": "abc", "token_type": "Bearer", "expires_in": 3599, "refresh_token": "ignored"}"#,
        )
        .expect("deserialize");
        assert_eq!(response.access_token, "abc");
        assert_eq!(response.expires_in, 3599);
    }

    #[test]
    fn test_token_carries_requested_scopes() {
        let response: TokenResponse =
            serde_json::from_str(r#"{"access_token": "abc", "expires_in": 60}"#)
                .expect("deserialize");
        let token = AccessToken::from_response(response, Scope::VIEWER);
        assert_eq!(token.scopes, vec![Scope::DataRead, Scope::ViewablesRead]);
        assert_eq!(token.token_type, "Bearer");
    }
}
