//! The job polling state machine.
//!
//! A submitted job moves `Submitted → Polling → Complete`, or drops out of
//! `Polling` on the attempt bound or the cancellation token. The first
//! status check happens immediately after submission; a completion marker
//! on that first check terminates the loop without ever sleeping.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use derivo_core::config::polling::PollingConfig;
use derivo_core::traits::ProgressSink;
use derivo_core::types::Urn;

use crate::error::DerivativeError;
use crate::models::JobManifest;

/// Source of job status observations. Decouples the poll loop from the
/// HTTP client so the state machine is testable against scripted statuses.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the current status document for a job.
    async fn fetch(&self, urn: &Urn) -> Result<JobManifest, DerivativeError>;
}

/// Polls a job until completion, with a fixed inter-poll delay, a bounded
/// number of status queries, and cancellation honored at every suspension
/// point.
///
/// Every observation is pushed synchronously to the progress sink; the sink
/// is the sole channel for incremental feedback and must not block.
#[derive(Debug, Clone)]
pub struct ProgressPoller {
    interval: Duration,
    max_attempts: u32,
}

impl ProgressPoller {
    /// Create a poller from the polling configuration.
    pub fn new(config: &PollingConfig) -> Self {
        Self {
            interval: config.interval(),
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Drive a job to completion.
    ///
    /// Returns the final manifest (progress == 100). Exceeding the query
    /// bound yields [`DerivativeError::PollTimeout`]; cancellation yields
    /// [`DerivativeError::Cancelled`] without waiting out the current
    /// delay.
    pub async fn poll_until_complete<S>(
        &self,
        source: &S,
        urn: &Urn,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Result<JobManifest, DerivativeError>
    where
        S: ManifestSource + ?Sized,
    {
        let mut attempts: u32 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(DerivativeError::Cancelled);
            }

            let manifest = tokio::select! {
                _ = cancel.cancelled() => return Err(DerivativeError::Cancelled),
                result = source.fetch(urn) => result?,
            };
            attempts += 1;

            let percent = manifest.percent();
            sink.on_progress(percent, manifest.pretty());
            debug!(attempt = attempts, percent, "Observed job status");

            if percent >= 100 {
                info!(attempts, "Translation complete");
                return Ok(manifest);
            }

            if attempts >= self.max_attempts {
                return Err(DerivativeError::PollTimeout { attempts });
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(DerivativeError::Cancelled),
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
