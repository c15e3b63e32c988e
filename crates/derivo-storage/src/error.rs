//! Upload errors.

use std::path::PathBuf;

use derivo_core::error::AppError;
use thiserror::Error;

use derivo_auth::AuthError;

/// Errors from bucket creation and object upload.
///
/// None of these are retried internally; the whole upload is re-run from
/// scratch by the caller if needed.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The local file is missing or unreadable.
    #[error("Cannot read source file {path}: {source}")]
    Source {
        /// The path that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file path has no usable base name.
    #[error("Source path has no usable file name: {path}")]
    InvalidFileName {
        /// The offending path.
        path: PathBuf,
    },

    /// The object store refused to create the bucket.
    #[error("Bucket creation rejected with status {status}: {body}")]
    BucketRejected {
        /// HTTP status returned by the bucket endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// The object transfer failed.
    #[error("Object upload failed with status {status}: {body}")]
    TransferFailed {
        /// HTTP status returned by the object endpoint.
        status: u16,
        /// Response body, for operator diagnosis.
        body: String,
    },

    /// The upload response did not match the expected shape.
    #[error("Malformed upload response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Transport-level failure.
    #[error("Upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Token acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Auth(auth) => auth.into(),
            UploadError::Source { .. } | UploadError::InvalidFileName { .. } => {
                AppError::validation(err.to_string())
            }
            _ => AppError::upload(err.to_string()),
        }
    }
}
