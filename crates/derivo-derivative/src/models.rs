//! Typed payloads for the conversion-service endpoints and the aggregate
//! results the pipeline hands back to callers.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use derivo_core::types::{DerivativeUrn, Urn};

use crate::error::DerivativeError;
use crate::extract;

/// Conversion job request: one output format with both 2D and 3D views.
#[derive(Debug, Clone, Serialize)]
pub struct JobPayload {
    input: JobInput,
    output: JobOutput,
}

#[derive(Debug, Clone, Serialize)]
struct JobInput {
    urn: String,
}

#[derive(Debug, Clone, Serialize)]
struct JobOutput {
    formats: Vec<OutputFormat>,
}

#[derive(Debug, Clone, Serialize)]
struct OutputFormat {
    #[serde(rename = "type")]
    kind: &'static str,
    views: Vec<&'static str>,
}

impl JobPayload {
    /// Build the standard viewer-geometry request for a source URN.
    ///
    /// The URN is forwarded exactly as upload produced it; no local
    /// validation is applied.
    pub fn viewer_geometry(urn: &Urn) -> Self {
        Self {
            input: JobInput {
                urn: urn.as_str().to_string(),
            },
            output: JobOutput {
                formats: vec![OutputFormat {
                    kind: "svf",
                    views: vec!["2d", "3d"],
                }],
            },
        }
    }
}

/// One observation of the job status endpoint.
///
/// Parsed tolerantly: the fields the poller consumes are lifted out, the
/// full document is retained for identifier mining and for the
/// pretty-printed payload handed to progress sinks.
#[derive(Debug, Clone)]
pub struct JobManifest {
    /// The raw `progress` string, when present. An absent or non-numeric
    /// value reads as complete.
    pub progress: Option<String>,
    /// The raw `status` string, when present.
    pub status: Option<String>,
    raw: Value,
    pretty: String,
}

impl JobManifest {
    /// Parse a status payload. Unknown fields are ignored; the payload must
    /// at least be well-formed JSON.
    pub fn parse(body: &str) -> Result<Self, DerivativeError> {
        let raw: Value = serde_json::from_str(body)?;
        let progress = raw
            .get("progress")
            .and_then(Value::as_str)
            .map(str::to_string);
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        let pretty = serde_json::to_string_pretty(&raw).unwrap_or_else(|_| body.to_string());

        Ok(Self {
            progress,
            status,
            raw,
            pretty,
        })
    }

    /// Completion percentage, 0–100.
    pub fn percent(&self) -> u8 {
        self.progress
            .as_deref()
            .map_or(100, extract::parse_progress)
    }

    /// The pretty-printed payload, as handed to progress sinks.
    pub fn pretty(&self) -> &str {
        &self.pretty
    }

    /// Derivative identifiers mined from the output entries, de-duplicated
    /// preserving first-seen document order.
    ///
    /// Only the `derivatives` subtree is walked, so the document's own
    /// top-level `urn` field is not mistaken for an output.
    pub fn derivative_urns(&self) -> Vec<DerivativeUrn> {
        let Some(outputs) = self.raw.get("derivatives") else {
            return Vec::new();
        };
        extract::dedup_first_seen(extract::collect_string_fields(outputs, "urn"))
            .into_iter()
            .map(DerivativeUrn::new)
            .collect()
    }
}

/// Result of a completed translation: the final manifest plus the
/// identifiers of every produced derivative.
#[derive(Debug, Clone)]
pub struct TranslationOutcome {
    /// Pretty-printed final status payload.
    pub manifest: String,
    /// Produced derivative identifiers, in payload order.
    pub derivatives: Vec<DerivativeUrn>,
}

/// One failed derivative download, kept so partial failure is reportable
/// rather than silently discarded.
#[derive(Debug)]
pub struct RetrievalFailure {
    /// The derivative whose download failed.
    pub derivative: DerivativeUrn,
    /// What went wrong.
    pub error: DerivativeError,
}

/// Aggregate result of a derivative retrieval batch.
///
/// A failure for one derivative never aborts the others; both outcomes are
/// collected here in batch order.
#[derive(Debug, Default)]
pub struct RetrievalReport {
    /// Paths of successfully saved derivative packages.
    pub saved: Vec<PathBuf>,
    /// Downloads that failed, with their reasons.
    pub failures: Vec<RetrievalFailure>,
}

impl RetrievalReport {
    /// True when every derivative in the batch was saved.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Everything one full pipeline run produced for a file.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Content identifier of the uploaded file.
    pub urn: Urn,
    /// Directory the artifacts were written to.
    pub output_dir: PathBuf,
    /// Produced derivative identifiers, in payload order.
    pub derivatives: Vec<DerivativeUrn>,
    /// Per-derivative download results, including isolated failures.
    pub retrieval: RetrievalReport,
    /// Path of the saved thumbnail image.
    pub thumbnail: PathBuf,
    /// Aggregated metadata for the first derivative, when the job produced
    /// any derivatives at all.
    pub metadata: Option<MetadataReport>,
}

/// Property data for one discovered view.
#[derive(Debug, Clone)]
pub struct ViewSection {
    /// View identifier the section was fetched for.
    pub guid: String,
    /// Pretty-printed per-object property graph.
    pub properties: String,
    /// Pretty-printed view-level metadata.
    pub metadata: String,
}

/// Aggregated metadata report for one derivative, sections in view
/// discovery order.
#[derive(Debug, Clone)]
pub struct MetadataReport {
    /// Pretty-printed top-level metadata document.
    pub document: String,
    /// Per-view sections, in discovery order.
    pub sections: Vec<ViewSection>,
    /// When the report was assembled.
    pub generated_at: DateTime<Utc>,
}

impl MetadataReport {
    /// Render the report as one text document: the metadata document
    /// followed by each view's properties and metadata, blank-line
    /// separated, in discovery order.
    pub fn to_text(&self) -> String {
        let mut out = self.document.clone();
        for section in &self.sections {
            out.push_str("\n\n");
            out.push_str(&section.properties);
            out.push_str("\n\n");
            out.push_str(&section.metadata);
        }
        out
    }
}
