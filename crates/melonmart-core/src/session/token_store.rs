//! Token store trait.
//!
//! The persisted bearer token is the single piece of durable client-side
//! state in the system. Only the session service writes it.

use async_trait::async_trait;

use crate::error::Result;

/// Durable single-slot storage for the bearer token.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - The token file has appropriate permissions (e.g. 600 on Unix)
/// - The token value is never logged or included in error messages
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any. An absent slot is `Ok(None)`.
    async fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    async fn save(&self, token: &str) -> Result<()>;

    /// Removes the stored token. Purging an empty slot is not an error.
    async fn purge(&self) -> Result<()>;
}
