//! HTTP client for the conversion service's design-data endpoints.
//!
//! Methods are one-to-one with remote endpoints and take the bearer token
//! explicitly: callers decide the token's scope and how long one token is
//! reused. A submit-and-poll batch shares a token; independent operations
//! acquire their own.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use tracing::debug;

use derivo_auth::AccessToken;
use derivo_core::config::service::ServiceConfig;
use derivo_core::types::{DerivativeUrn, Urn};

use crate::error::DerivativeError;
use crate::models::{JobManifest, JobPayload};
use crate::poll::ManifestSource;

/// Path prefix of the design-data endpoints.
const DESIGN_DATA: &str = "/modelderivative/v2/designdata";

/// Characters escaped when an identifier is placed in a URL path segment.
/// Unreserved characters stay literal.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_segment(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s, SEGMENT).to_string()
}

/// Client for job submission, status queries, and artifact downloads.
#[derive(Debug, Clone)]
pub struct DerivativeClient {
    client: Client,
    base_url: String,
}

impl DerivativeClient {
    /// Create a client sized for data-plane transfers (downloads share this
    /// client with the quick status queries).
    pub fn new(config: &ServiceConfig) -> Result<Self, DerivativeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.transfer_timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, config.base_url()))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Submit a conversion job for a source URN.
    pub async fn submit_job(&self, urn: &Urn, bearer: &str) -> Result<(), DerivativeError> {
        debug!(urn = %urn, "Submitting translation job");

        let response = self
            .client
            .post(format!("{}{}/job", self.base_url, DESIGN_DATA))
            .bearer_auth(bearer)
            .json(&JobPayload::viewer_geometry(urn))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DerivativeError::Submit {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }

    /// Fetch the current job manifest.
    pub async fn manifest(&self, urn: &Urn, bearer: &str) -> Result<JobManifest, DerivativeError> {
        let response = self
            .client
            .get(format!(
                "{}{}/{}/manifest",
                self.base_url,
                DESIGN_DATA,
                encode_segment(urn.as_str())
            ))
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DerivativeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        JobManifest::parse(&body)
    }

    /// Download one derivative package.
    pub async fn download_derivative(
        &self,
        urn: &Urn,
        derivative: &DerivativeUrn,
        bearer: &str,
    ) -> Result<Bytes, DerivativeError> {
        let response = self
            .client
            .get(format!(
                "{}{}/{}/manifest/{}",
                self.base_url,
                DESIGN_DATA,
                encode_segment(urn.as_str()),
                encode_segment(derivative.as_str())
            ))
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DerivativeError::Download {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?)
    }

    /// Download the thumbnail image for a design.
    pub async fn download_thumbnail(
        &self,
        urn: &Urn,
        bearer: &str,
    ) -> Result<Bytes, DerivativeError> {
        let response = self
            .client
            .get(format!(
                "{}{}/{}/thumbnail",
                self.base_url,
                DESIGN_DATA,
                encode_segment(urn.as_str())
            ))
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(DerivativeError::Download {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?)
    }

    /// Fetch the metadata document for a derivative.
    pub async fn metadata_document(
        &self,
        key: &DerivativeUrn,
        bearer: &str,
    ) -> Result<String, DerivativeError> {
        let response = self
            .client
            .get(format!(
                "{}{}/{}/metadata",
                self.base_url,
                DESIGN_DATA,
                encode_segment(key.as_str())
            ))
            .bearer_auth(bearer)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DerivativeError::MetadataRejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Fetch the per-object property graph for one view.
    pub async fn view_properties(
        &self,
        key: &DerivativeUrn,
        guid: &str,
        bearer: &str,
    ) -> Result<String, DerivativeError> {
        self.view_fetch(
            format!(
                "{}{}/{}/metadata/{}/properties",
                self.base_url,
                DESIGN_DATA,
                encode_segment(key.as_str()),
                encode_segment(guid)
            ),
            guid,
            bearer,
        )
        .await
    }

    /// Fetch the view-level metadata for one view.
    pub async fn view_metadata(
        &self,
        key: &DerivativeUrn,
        guid: &str,
        bearer: &str,
    ) -> Result<String, DerivativeError> {
        self.view_fetch(
            format!(
                "{}{}/{}/metadata/{}",
                self.base_url,
                DESIGN_DATA,
                encode_segment(key.as_str()),
                encode_segment(guid)
            ),
            guid,
            bearer,
        )
        .await
    }

    async fn view_fetch(
        &self,
        url: String,
        guid: &str,
        bearer: &str,
    ) -> Result<String, DerivativeError> {
        let response = self.client.get(url).bearer_auth(bearer).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(DerivativeError::ViewFetch {
                guid: guid.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }

    /// Bind a token to this client as a [`ManifestSource`] for the poller.
    pub fn status_source(&self, token: AccessToken) -> StatusSource<'_> {
        StatusSource {
            client: self,
            token,
        }
    }
}

/// A [`ManifestSource`] over the manifest endpoint with a captured token;
/// one submit-and-poll batch reuses one token.
#[derive(Debug, Clone)]
pub struct StatusSource<'a> {
    client: &'a DerivativeClient,
    token: AccessToken,
}

#[async_trait]
impl ManifestSource for StatusSource<'_> {
    async fn fetch(&self, urn: &Urn) -> Result<JobManifest, DerivativeError> {
        self.client.manifest(urn, self.token.bearer()).await
    }
}
