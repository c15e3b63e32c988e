//! Console progress reporting.

use derivo_core::traits::ProgressSink;

/// Progress sink that renders poll observations on the console.
///
/// The full status payload is only emitted at debug level; the normal
/// output is one line per observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ProgressSink for ConsoleSink {
    fn on_progress(&self, percent: u8, manifest: &str) {
        println!("  translating... {percent}%");
        tracing::debug!(percent, manifest, "Job status observed");
    }
}
