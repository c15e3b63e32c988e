//! Caller-supplied client credentials.

use std::fmt;

use derivo_core::config::CredentialsConfig;

use crate::error::AuthError;

/// Opaque client credentials for the remote service.
///
/// Immutable once constructed and never persisted. The secret is redacted
/// from `Debug` output so credentials can appear in traced spans safely.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Create credentials from raw strings.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// The client identifier.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Fail fast when either value is empty or blank.
    ///
    /// Retrying a token exchange with bad credentials is certain to fail
    /// again, so the check happens before any network I/O.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        Ok(())
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl From<&CredentialsConfig> for ClientCredentials {
    fn from(config: &CredentialsConfig) -> Self {
        Self::new(config.client_id.clone(), config.client_secret.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let creds = ClientCredentials::new("my-client", "super-secret");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("my-client"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        assert!(matches!(
            ClientCredentials::new("", "secret").validate(),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            ClientCredentials::new("id", "   ").validate(),
            Err(AuthError::MissingCredentials)
        ));
        assert!(ClientCredentials::new("id", "secret").validate().is_ok());
    }
}
