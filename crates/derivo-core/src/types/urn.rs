//! Content and derivative identifiers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base64-encoded handle to an uploaded object.
///
/// Produced once per uploaded file by encoding the raw object identifier the
/// object store returns; stable for the file's lifetime in the remote store
/// and used as the key for every subsequent job, status, and artifact query.
/// No local validation is performed on the value: whatever the upload
/// produced is accepted unchanged as a job input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    /// Wrap an already-encoded identifier.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode a raw object identifier into a URN.
    pub fn from_object_id(object_id: &str) -> Self {
        Self(STANDARD.encode(object_id.as_bytes()))
    }

    /// The encoded identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Urn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Urn {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}

/// Opaque identifier of one produced output of a conversion job.
///
/// Mined from the completed job manifest; each derivative is independently
/// retrievable. The value usually looks like a path
/// (`urn:...:fs.file:.../output/geometry.svf`), so the final path segment
/// doubles as a local file name for the downloaded package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivativeUrn(String);

impl DerivativeUrn {
    /// Wrap a derivative identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final path segment of the identifier, used as the local file
    /// name when the derivative package is saved to disk. Identifiers with
    /// no path separator are returned whole.
    pub fn base_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for DerivativeUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DerivativeUrn {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
