//! Streamed object upload into a fresh transient bucket.

use std::path::Path;
use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use derivo_auth::TokenProvider;
use derivo_core::config::service::ServiceConfig;
use derivo_core::types::{Scope, Urn};

use crate::error::UploadError;
use crate::models::{CreateBucketRequest, UploadedObject};

/// Characters escaped when an object name is placed in a URL path segment.
/// Unreserved characters stay literal.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SEGMENT).to_string()
}

/// Uploads a local file into a fresh transient bucket and returns the
/// resulting content identifier.
///
/// The bucket and object outlive the call; the store expires transient
/// buckets server-side, so no cleanup is performed here.
#[derive(Debug, Clone)]
pub struct ObjectUploader {
    client: Client,
    base_url: String,
    tokens: TokenProvider,
}

impl ObjectUploader {
    /// Create an uploader with its own HTTP client sized for data-plane
    /// transfers.
    pub fn new(config: &ServiceConfig, tokens: TokenProvider) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.transfer_timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, config.base_url(), tokens))
    }

    /// Create an uploader sharing an existing HTTP client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        tokens: TokenProvider,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Upload a file and return its URN.
    ///
    /// Each step is an independent failure point: local read, bucket
    /// creation, and the streamed transfer. Nothing is retried; on failure
    /// the caller re-runs the whole upload.
    #[instrument(skip(self), fields(file = %file_path.display()))]
    pub async fn upload(&self, file_path: &Path) -> Result<Urn, UploadError> {
        let object_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| UploadError::InvalidFileName {
                path: file_path.to_path_buf(),
            })?
            .to_string();

        let file = tokio::fs::File::open(file_path)
            .await
            .map_err(|source| UploadError::Source {
                path: file_path.to_path_buf(),
                source,
            })?;
        let length = file
            .metadata()
            .await
            .map_err(|source| UploadError::Source {
                path: file_path.to_path_buf(),
                source,
            })?
            .len();

        let bucket_key = Uuid::new_v4().to_string();
        let token = self.tokens.acquire(Scope::DATA_RW).await?;

        self.create_bucket(&bucket_key, token.bearer()).await?;

        info!(
            bucket = %bucket_key,
            object = %object_name,
            bytes = length,
            "Uploading object"
        );

        let url = format!(
            "{}/oss/v2/buckets/{}/objects/{}",
            self.base_url,
            bucket_key,
            encode_segment(&object_name)
        );

        let response = self
            .client
            .put(url)
            .bearer_auth(token.bearer())
            .header(CONTENT_LENGTH, length)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(UploadError::TransferFailed {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadedObject = serde_json::from_str(&body)?;
        let urn = Urn::from_object_id(&uploaded.object_id);
        info!(urn = %urn, "Upload complete");

        Ok(urn)
    }

    async fn create_bucket(&self, bucket_key: &str, bearer: &str) -> Result<(), UploadError> {
        debug!(bucket = %bucket_key, "Creating transient bucket");

        let response = self
            .client
            .post(format!("{}/oss/v2/buckets", self.base_url))
            .bearer_auth(bearer)
            .json(&CreateBucketRequest::transient(bucket_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(UploadError::BucketRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_segment_keeps_unreserved() {
        assert_eq!(encode_segment("model.rvt"), "model.rvt");
        assert_eq!(encode_segment("my model (1).rvt"), "my%20model%20%281%29.rvt");
    }
}
