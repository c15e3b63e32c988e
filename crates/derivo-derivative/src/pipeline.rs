//! The translation pipeline facade.
//!
//! [`Translator`] wires the token provider, uploader, and derivative client
//! together and exposes the independently awaitable entry points a UI-like
//! collaborator consumes, plus [`Translator::run`], the whole
//! upload → translate → retrieve pipeline for one file.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

use derivo_auth::{AuthError, ClientCredentials, TokenProvider};
use derivo_core::config::AppConfig;
use derivo_core::config::polling::PollingConfig;
use derivo_core::error::AppError;
use derivo_core::result::AppResult;
use derivo_core::traits::ProgressSink;
use derivo_core::types::{DerivativeUrn, Scope, Urn};

use derivo_storage::{ObjectUploader, UploadError};

use crate::client::DerivativeClient;
use crate::error::DerivativeError;
use crate::metadata::MetadataExtractor;
use crate::models::{MetadataReport, PipelineOutcome, RetrievalReport, TranslationOutcome};
use crate::poll::ProgressPoller;
use crate::retrieve::DerivativeRetriever;

/// Orchestrates the translation workflow for one file at a time.
///
/// Each entry point acquires its own scoped token; nothing is shared or
/// cached between operations, so entry points may be called independently
/// and in any order that respects the job lifecycle (no retrieval before a
/// completed translation).
#[derive(Debug, Clone)]
pub struct Translator {
    polling: PollingConfig,
    output_root: Option<PathBuf>,
    tokens: TokenProvider,
    uploader: ObjectUploader,
    client: DerivativeClient,
}

impl Translator {
    /// Build a translator from the application configuration.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let credentials = ClientCredentials::from(&config.credentials);
        let tokens =
            TokenProvider::new(&config.service, credentials).map_err(AppError::from)?;
        let uploader =
            ObjectUploader::new(&config.service, tokens.clone()).map_err(AppError::from)?;
        let client = DerivativeClient::new(&config.service).map_err(AppError::from)?;

        Ok(Self {
            polling: config.polling.clone(),
            output_root: config.output.directory.as_ref().map(PathBuf::from),
            tokens,
            uploader,
            client,
        })
    }

    /// Upload a local file, producing the URN that keys the rest of the
    /// pipeline.
    pub async fn upload(&self, file: &Path) -> Result<Urn, UploadError> {
        self.uploader.upload(file).await
    }

    /// Submit a conversion job and poll it to completion.
    ///
    /// One token covers the submit-and-poll batch. Every status
    /// observation is pushed to `sink`; the cancellation token is honored
    /// at every suspension point.
    pub async fn translate(
        &self,
        urn: &Urn,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<TranslationOutcome, DerivativeError> {
        if cancel.is_cancelled() {
            return Err(DerivativeError::Cancelled);
        }

        let token = self.tokens.acquire(Scope::DATA_RW).await?;
        self.client.submit_job(urn, token.bearer()).await?;

        let source = self.client.status_source(token);
        let poller = ProgressPoller::new(&self.polling);
        let manifest = poller
            .poll_until_complete(&source, urn, sink, cancel)
            .await?;

        let derivatives = manifest.derivative_urns();
        info!(urn = %urn, derivatives = derivatives.len(), "Translation produced derivatives");

        Ok(TranslationOutcome {
            manifest: manifest.pretty().to_string(),
            derivatives,
        })
    }

    /// Download every derivative package into `output_dir`, isolating
    /// per-item failures into the returned report.
    pub async fn fetch_manifests(
        &self,
        urn: &Urn,
        derivatives: &[DerivativeUrn],
        output_dir: &Path,
    ) -> Result<RetrievalReport, DerivativeError> {
        DerivativeRetriever::new(&self.client, &self.tokens)
            .fetch_manifests(urn, derivatives, output_dir)
            .await
    }

    /// Download the thumbnail image into `output_dir`.
    pub async fn fetch_thumbnail(
        &self,
        urn: &Urn,
        output_dir: &Path,
    ) -> Result<PathBuf, DerivativeError> {
        DerivativeRetriever::new(&self.client, &self.tokens)
            .fetch_thumbnail(urn, output_dir)
            .await
    }

    /// Aggregate the metadata report for one derivative.
    pub async fn extract_metadata(
        &self,
        derivative: &DerivativeUrn,
    ) -> Result<MetadataReport, DerivativeError> {
        MetadataExtractor::new(&self.client, &self.tokens)
            .extract(derivative)
            .await
    }

    /// Render a local viewer URL carrying a fresh read-only token.
    pub async fn viewer_url(&self, port: u16, urn: &Urn) -> Result<String, AuthError> {
        let token = self.tokens.acquire(Scope::VIEWER).await?;
        Ok(format!(
            "http://localhost:{port}?urn={urn}&token={}&expiresin={}",
            token.access_token, token.expires_in
        ))
    }

    /// The output directory for a file's artifacts: the configured root or
    /// the file's own directory, plus a component named after the URN.
    pub fn output_dir_for(&self, file: &Path, urn: &Urn) -> PathBuf {
        let base = match &self.output_root {
            Some(root) => root.clone(),
            None => file.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        // The base64 alphabet includes '/', which cannot appear in a path
        // component.
        base.join(urn.as_str().replace(['/', '\\'], "_"))
    }

    /// Run the whole pipeline for one file.
    ///
    /// Per-derivative retrieval failures are reported, not fatal; thumbnail
    /// and metadata failures abort with an error. Metadata is extracted for
    /// the first derivative, when the job produced any.
    #[instrument(skip(self, sink, cancel), fields(file = %file.display()))]
    pub async fn run(
        &self,
        file: &Path,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> AppResult<PipelineOutcome> {
        let urn = self.upload(file).await.map_err(AppError::from)?;

        let output_dir = self.output_dir_for(file, &urn);
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(AppError::from)?;

        let outcome = self
            .translate(&urn, sink, cancel)
            .await
            .map_err(AppError::from)?;

        if cancel.is_cancelled() {
            return Err(AppError::from(DerivativeError::Cancelled));
        }
        let retrieval = self
            .fetch_manifests(&urn, &outcome.derivatives, &output_dir)
            .await
            .map_err(AppError::from)?;

        if cancel.is_cancelled() {
            return Err(AppError::from(DerivativeError::Cancelled));
        }
        let thumbnail = self
            .fetch_thumbnail(&urn, &output_dir)
            .await
            .map_err(AppError::from)?;

        let metadata = match outcome.derivatives.first() {
            Some(first) => Some(
                self.extract_metadata(first)
                    .await
                    .map_err(AppError::from)?,
            ),
            None => None,
        };

        info!(
            urn = %urn,
            output_dir = %output_dir.display(),
            "Pipeline finished"
        );

        Ok(PipelineOutcome {
            urn,
            output_dir,
            derivatives: outcome.derivatives,
            retrieval,
            thumbnail,
            metadata,
        })
    }
}
