//! Shared identifier and capability types.

pub mod scope;
pub mod urn;

pub use scope::Scope;
pub use urn::{DerivativeUrn, Urn};
