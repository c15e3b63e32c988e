//! Derivative package and thumbnail retrieval.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use futures::stream;
use tracing::{info, warn};

use derivo_auth::TokenProvider;
use derivo_core::types::{DerivativeUrn, Scope, Urn};

use crate::client::DerivativeClient;
use crate::error::DerivativeError;
use crate::models::{RetrievalFailure, RetrievalReport};

/// Fixed file name of the saved thumbnail image.
pub const THUMBNAIL_FILE: &str = "thumbnail.png";

/// Concurrent downloads per retrieval batch. Derivatives share no mutable
/// state, so a small bounded fan-out is safe.
const DOWNLOAD_CONCURRENCY: usize = 4;

/// Downloads derivative packages and the thumbnail to a caller-chosen
/// output directory.
#[derive(Debug, Clone, Copy)]
pub struct DerivativeRetriever<'a> {
    client: &'a DerivativeClient,
    tokens: &'a TokenProvider,
}

impl<'a> DerivativeRetriever<'a> {
    /// Create a retriever over an existing client and token provider.
    pub fn new(client: &'a DerivativeClient, tokens: &'a TokenProvider) -> Self {
        Self { client, tokens }
    }

    /// Download every derivative package into `output_dir`, each saved
    /// under the derivative's base name.
    ///
    /// One bearer token covers the whole batch. A failure for one
    /// derivative never aborts the others: it is logged and recorded in
    /// the report, and the remaining downloads proceed. Only
    /// whole-batch preconditions (token acquisition) fail the call
    /// itself.
    pub async fn fetch_manifests(
        &self,
        urn: &Urn,
        derivatives: &[DerivativeUrn],
        output_dir: &Path,
    ) -> Result<RetrievalReport, DerivativeError> {
        let token = self.tokens.acquire(&[Scope::DataRead]).await?;

        let results: Vec<(DerivativeUrn, Result<PathBuf, DerivativeError>)> =
            stream::iter(derivatives.iter().cloned())
                .map(|derivative| {
                    let bearer = token.bearer().to_string();
                    async move {
                        let saved = self
                            .fetch_one(urn, &derivative, &bearer, output_dir)
                            .await;
                        (derivative, saved)
                    }
                })
                .buffered(DOWNLOAD_CONCURRENCY)
                .collect()
                .await;

        let mut report = RetrievalReport::default();
        for (derivative, result) in results {
            match result {
                Ok(path) => report.saved.push(path),
                Err(error) => {
                    warn!(
                        derivative = %derivative,
                        error = %error,
                        "Derivative download failed, continuing with the rest"
                    );
                    report.failures.push(RetrievalFailure { derivative, error });
                }
            }
        }

        info!(
            saved = report.saved.len(),
            failed = report.failures.len(),
            "Derivative retrieval finished"
        );
        Ok(report)
    }

    async fn fetch_one(
        &self,
        urn: &Urn,
        derivative: &DerivativeUrn,
        bearer: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, DerivativeError> {
        let data = self
            .client
            .download_derivative(urn, derivative, bearer)
            .await?;

        let path = output_dir.join(derivative.base_name());
        tokio::fs::write(&path, &data).await?;

        info!(
            derivative = %derivative,
            path = %path.display(),
            bytes = data.len(),
            "Saved derivative package"
        );
        Ok(path)
    }

    /// Download the thumbnail image to `output_dir/thumbnail.png`.
    ///
    /// Unlike per-derivative downloads this failure is fatal to the stage:
    /// downstream consumers rely on the preview existing.
    pub async fn fetch_thumbnail(
        &self,
        urn: &Urn,
        output_dir: &Path,
    ) -> Result<PathBuf, DerivativeError> {
        let token = self.tokens.acquire(Scope::VIEWER).await?;
        let data = self.client.download_thumbnail(urn, token.bearer()).await?;

        let path = output_dir.join(THUMBNAIL_FILE);
        tokio::fs::write(&path, &data).await?;

        info!(path = %path.display(), bytes = data.len(), "Saved thumbnail");
        Ok(path)
    }
}
