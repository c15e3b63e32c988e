//! # derivo-storage
//!
//! Object upload for the Derivo pipeline: creates a transient storage
//! bucket and streams a local file into it, producing the stable content
//! identifier (URN) that keys every subsequent job and artifact query.

pub mod error;
pub mod models;
pub mod uploader;

pub use error::UploadError;
pub use uploader::ObjectUploader;
