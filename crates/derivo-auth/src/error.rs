//! Token acquisition errors.

use derivo_core::error::AppError;
use thiserror::Error;

/// Errors from credential validation and token exchange.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Client id or secret is empty. Caught before any network I/O.
    #[error("Client credentials are missing or blank")]
    MissingCredentials,

    /// The authentication endpoint rejected the exchange.
    #[error("Token exchange rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// The token payload did not match the expected shape.
    #[error("Malformed token payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Transport-level failure reaching the endpoint.
    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::MissingCredentials => AppError::validation(err.to_string()),
            AuthError::Rejected { status, .. } if (400..500).contains(status) => {
                AppError::authentication(err.to_string())
            }
            AuthError::Rejected { .. } | AuthError::Transport(_) => {
                AppError::external_service(err.to_string())
            }
            AuthError::Malformed(_) => {
                AppError::new(derivo_core::error::ErrorKind::Serialization, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use derivo_core::error::ErrorKind;

    #[test]
    fn test_client_rejection_maps_to_authentication() {
        let err = AuthError::Rejected {
            status: 401,
            body: "invalid client".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Authentication);
    }

    #[test]
    fn test_server_rejection_maps_to_external_service() {
        let err = AuthError::Rejected {
            status: 503,
            body: "maintenance".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::ExternalService);
    }

    #[test]
    fn test_missing_credentials_map_to_validation() {
        let app: AppError = AuthError::MissingCredentials.into();
        assert_eq!(app.kind, ErrorKind::Validation);
    }
}
