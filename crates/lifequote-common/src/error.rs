//! Error types for LifeQuote
//!
//! Provides a unified error type and the input validation variants

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using QuoteError
pub type Result<T> = std::result::Result<T, QuoteError>;

/// Unified error type for quote operations
#[derive(Debug, Error)]
pub enum QuoteError {
    // Input rejected before pricing
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // Missing or expired quote, raised by transports that need an error
    #[error("Quote not found or expired: {0}")]
    NotFound(String),

    // Stored value that no longer deserializes
    #[error("Corrupt quote record at {key}: {reason}")]
    CorruptRecord { key: String, reason: String },

    // Key-value backend unreachable or failing
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuoteError {
    /// Whether the error came from the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, QuoteError::Validation(_))
    }

    /// Whether the error means the backing store could not serve the call
    pub fn is_backend_unavailable(&self) -> bool {
        matches!(self, QuoteError::BackendUnavailable(_))
    }
}

/// Input domain violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("age must be between {min} and {max}, got {actual}")]
    AgeOutOfRange { actual: u8, min: u8, max: u8 },

    #[error("coverage amount must be between {min} and {max}, got {actual}")]
    CoverageOutOfRange {
        actual: Decimal,
        min: Decimal,
        max: Decimal,
    },

    #[error("gender must be one of: male, female")]
    UnknownGender,
}

// Implement From for common external error types
impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Serialization(err.to_string())
    }
}
