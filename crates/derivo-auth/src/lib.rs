//! # derivo-auth
//!
//! Credential storage and bearer-token acquisition for the Derivo pipeline.
//!
//! Tokens are short-lived and acquired fresh for every logical operation;
//! there is no cache to go stale and no refresh locking, at the cost of one
//! extra round-trip per pipeline stage.

pub mod credentials;
pub mod error;
pub mod provider;
pub mod token;

pub use credentials::ClientCredentials;
pub use error::AuthError;
pub use provider::TokenProvider;
pub use token::AccessToken;
