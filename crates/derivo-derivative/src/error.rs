//! Unified error type for translation, polling, and retrieval.
//!
//! All subsystem errors (submission, status polling, artifact download,
//! metadata aggregation) are consolidated into a single `DerivativeError`
//! enum that maps cleanly to `derivo_core::error::AppError`.

use derivo_core::error::{AppError, ErrorKind};
use thiserror::Error;

use derivo_auth::AuthError;

/// Unified error type for all translation-job operations.
#[derive(Debug, Error)]
pub enum DerivativeError {
    // --- Submission ---
    /// The conversion service rejected the job request. Fatal for this
    /// source file; never retried.
    #[error("Job submission rejected with status {status}: {body}")]
    Submit {
        /// HTTP status returned by the job endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    // --- Polling ---
    /// A status query was rejected.
    #[error("Status query rejected with status {status}: {body}")]
    Status {
        /// HTTP status returned by the manifest endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// The job never reported completion within the attempt bound.
    #[error("Job did not complete within {attempts} status queries")]
    PollTimeout {
        /// Number of queries performed before giving up.
        attempts: u32,
    },

    /// The operation was cancelled via the cancellation token.
    #[error("Translation was cancelled")]
    Cancelled,

    // --- Retrieval ---
    /// An artifact download (derivative package or thumbnail) was refused.
    #[error("Artifact download failed with status {status}: {body}")]
    Download {
        /// HTTP status returned by the artifact endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    // --- Metadata ---
    /// The metadata document fetch was refused.
    #[error("Metadata document fetch failed with status {status}: {body}")]
    MetadataRejected {
        /// HTTP status returned by the metadata endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// A per-view fetch failed; aborts the whole extraction.
    #[error("Fetch for view {guid} failed with status {status}: {body}")]
    ViewFetch {
        /// Identifier of the view whose fetch failed.
        guid: String,
        /// HTTP status returned by the view endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    // --- Generic ---
    /// A status or metadata payload was not valid JSON.
    #[error("Malformed service payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Transport-level failure.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Local I/O failure while persisting an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Token acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<DerivativeError> for AppError {
    fn from(err: DerivativeError) -> Self {
        match err {
            DerivativeError::Auth(auth) => auth.into(),
            DerivativeError::PollTimeout { .. } => AppError::timeout(err.to_string()),
            DerivativeError::Cancelled => AppError::cancelled(err.to_string()),
            DerivativeError::Submit { .. } | DerivativeError::Status { .. } => {
                AppError::translation(err.to_string())
            }
            DerivativeError::Download { .. } => AppError::retrieval(err.to_string()),
            DerivativeError::MetadataRejected { .. } | DerivativeError::ViewFetch { .. } => {
                AppError::metadata(err.to_string())
            }
            DerivativeError::Malformed(_) => {
                AppError::new(ErrorKind::Serialization, err.to_string())
            }
            DerivativeError::Transport(_) => AppError::external_service(err.to_string()),
            DerivativeError::Io(_) => AppError::new(ErrorKind::Io, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_timeout_kind() {
        let app: AppError = DerivativeError::PollTimeout { attempts: 150 }.into();
        assert_eq!(app.kind, ErrorKind::Timeout);
        assert!(app.message.contains("150"));
    }

    #[test]
    fn test_auth_errors_keep_their_own_mapping() {
        let app: AppError = DerivativeError::Auth(AuthError::MissingCredentials).into();
        assert_eq!(app.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_view_fetch_names_the_failing_view() {
        let err = DerivativeError::ViewFetch {
            guid: "4f981e94".to_string(),
            status: 404,
            body: "no such view".to_string(),
        };
        assert!(err.to_string().contains("4f981e94"));
        let app: AppError = err.into();
        assert_eq!(app.kind, ErrorKind::Metadata);
    }
}
