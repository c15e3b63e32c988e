//! Cross-crate trait seams.

pub mod progress;

pub use progress::{ChannelSink, NullSink, ProgressSink, ProgressUpdate};
