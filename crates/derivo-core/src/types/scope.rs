//! Capability scopes requested when acquiring bearer tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named permission requested from the authentication endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Create transient storage buckets.
    BucketCreate,
    /// Read bucket contents.
    BucketRead,
    /// Read stored objects and job data.
    DataRead,
    /// Create new objects.
    DataCreate,
    /// Overwrite existing objects.
    DataWrite,
    /// Read viewer-facing derivatives.
    ViewablesRead,
}

impl Scope {
    /// The wire representation of the scope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BucketCreate => "bucket:create",
            Self::BucketRead => "bucket:read",
            Self::DataRead => "data:read",
            Self::DataCreate => "data:create",
            Self::DataWrite => "data:write",
            Self::ViewablesRead => "viewables:read",
        }
    }

    /// The scope set used for uploads and job submission: bucket creation
    /// plus full data access.
    pub const DATA_RW: &'static [Scope] = &[
        Scope::BucketCreate,
        Scope::DataRead,
        Scope::DataCreate,
        Scope::DataWrite,
    ];

    /// The scope set used for read-only viewer access.
    pub const VIEWER: &'static [Scope] = &[Scope::DataRead, Scope::ViewablesRead];

    /// Join a scope set into the space-separated wire string.
    pub fn join(scopes: &[Scope]) -> String {
        scopes
            .iter()
            .map(Scope::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
