//! Wire payloads for the object-store endpoints.

use serde::{Deserialize, Serialize};

/// Bucket creation request.
///
/// Buckets are always created with the `transient` retention policy: the
/// store expires them server-side, so the pipeline never cleans them up.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketRequest {
    /// Fresh random bucket key (UUID v4, collision-free by construction).
    pub bucket_key: String,
    /// Retention policy; always `"transient"`.
    pub policy_key: &'static str,
}

impl CreateBucketRequest {
    /// Build a transient-bucket request for the given key.
    pub fn transient(bucket_key: impl Into<String>) -> Self {
        Self {
            bucket_key: bucket_key.into(),
            policy_key: "transient",
        }
    }
}

/// The slice of the upload response the pipeline consumes.
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedObject {
    /// Raw object identifier assigned by the store; base64-encoding this
    /// yields the externally usable URN.
    pub object_id: String,
    /// Stored size in bytes, when reported.
    #[serde(default)]
    pub size: Option<u64>,
}
