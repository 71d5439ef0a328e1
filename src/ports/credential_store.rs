//! Credential Store Port - source of the bearer token attached to requests.
//!
//! The store is read-only from the client's point of view; populating it is
//! the job of an external login flow.

use async_trait::async_trait;
use secrecy::Secret;

/// Port for reading the ambient bearer token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the current token, or `None` when no one is logged in.
    ///
    /// Called once per request, so a token written by another process is
    /// picked up without restarting.
    async fn token(&self) -> Option<Secret<String>>;
}
