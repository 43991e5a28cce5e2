//! Key-value backend contract
//!
//! The quote store only needs string keys, string values, and a per-key
//! time-to-live. Expiry is enforced by the backend, never re-checked by
//! callers.

use async_trait::async_trait;
use lifequote_common::QuoteError;
use thiserror::Error;

/// Errors from key-value backend operations
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend could not be reached (refused, dropped, timed out, closed)
    #[error("backend unreachable: {0}")]
    Unavailable(String),

    /// Backend answered with an error
    #[error("backend command failed: {0}")]
    Command(String),
}

impl From<BackendError> for QuoteError {
    fn from(err: BackendError) -> Self {
        QuoteError::BackendUnavailable(err.to_string())
    }
}

/// Trait for key-value backends holding expiring string values
#[async_trait]
pub trait KeyValueBackend: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl_secs`
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError>;

    /// Read the value under `key`; `None` when missing or expired
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Remove `key`, reporting whether it existed
    async fn delete(&self, key: &str) -> Result<bool, BackendError>;

    /// Reset the time-to-live of `key`, reporting whether it existed
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, BackendError>;

    /// Health check
    async fn ping(&self) -> Result<(), BackendError>;

    /// Backend name for logs and health output
    fn name(&self) -> &'static str;
}
