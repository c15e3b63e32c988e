//! One-way progress notification from the polling loop to its consumer.
//!
//! The poller writes observations; the consumer (a CLI printer, a UI event
//! loop, a test recorder) drains them. Implementations are invoked
//! synchronously from the scheduler's context and must return promptly;
//! a sink that blocks stalls the polling loop.

use tokio::sync::mpsc;

/// A single progress observation of a running translation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Extracted completion percentage, 0–100.
    pub percent: u8,
    /// Pretty-printed raw status payload the percentage was extracted from.
    pub manifest: String,
}

/// Receiver of progress observations.
pub trait ProgressSink: Send + Sync {
    /// Called once per status observation, in observation order.
    fn on_progress(&self, percent: u8, manifest: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(u8, &str) + Send + Sync,
{
    fn on_progress(&self, percent: u8, manifest: &str) {
        self(percent, manifest)
    }
}

/// Sink that discards all observations.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&self, _percent: u8, _manifest: &str) {}
}

/// Channel-backed sink for consumers with their own event loop.
///
/// Sends never block; if the receiving side has gone away the observation
/// is dropped, which keeps a detached consumer from stalling the poller.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressUpdate>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn on_progress(&self, percent: u8, manifest: &str) {
        let _ = self.tx.send(ProgressUpdate {
            percent,
            manifest: manifest.to_string(),
        });
    }
}
