//! # derivo-derivative
//!
//! The translation core of Derivo: submits conversion jobs against an
//! uploaded design, polls the job manifest until completion with bounded
//! attempts and cancellation, then fans out to retrieve derivative
//! packages, the thumbnail, and an aggregated metadata report.
//!
//! [`pipeline::Translator`] is the facade consumed by callers; the other
//! modules are its moving parts and are usable on their own.

pub mod client;
pub mod error;
pub mod extract;
pub mod metadata;
pub mod models;
pub mod pipeline;
pub mod poll;
pub mod retrieve;

pub use client::DerivativeClient;
pub use error::DerivativeError;
pub use models::{
    JobManifest, MetadataReport, PipelineOutcome, RetrievalReport, TranslationOutcome,
};
pub use pipeline::Translator;
pub use poll::{ManifestSource, ProgressPoller};
