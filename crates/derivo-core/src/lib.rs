//! # derivo-core
//!
//! Core crate for Derivo. Contains configuration schemas, shared identifier
//! types, the progress-notification trait, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Derivo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
