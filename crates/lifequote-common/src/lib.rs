//! # LifeQuote Common
//!
//! Shared types and errors for the LifeQuote premium service.
//!
//! ## Core Types
//!
//! - [`QuoteInput`]: Applicant attributes submitted for pricing
//! - [`Quote`]: Persisted, immutable premium quote
//! - [`RiskClass`]: Coarse underwriting bucket reported with each quote
//! - [`QuoteError`]: Unified error taxonomy for the quote core

pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{QuoteError, Result, ValidationError};
pub use types::{
    quote::{PremiumBreakdown, Quote, QuoteId, RiskClass},
    quote_input::{Gender, QuoteInput, SmokingStatus},
};

/// LifeQuote version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Youngest insurable applicant age
pub const MIN_AGE: u8 = 18;

/// Oldest insurable applicant age
pub const MAX_AGE: u8 = 80;

/// Minimum coverage amount in dollars
pub const MIN_COVERAGE_AMOUNT: i64 = 10_000;

/// Maximum coverage amount in dollars
pub const MAX_COVERAGE_AMOUNT: i64 = 5_000_000;

/// Days a quote stays retrievable after creation
pub const QUOTE_RETENTION_DAYS: i64 = 30;

/// Quote time-to-live in seconds (30 days)
pub const QUOTE_TTL_SECS: u64 = QUOTE_RETENTION_DAYS as u64 * 24 * 60 * 60;

/// Longest accepted quote time-to-live in seconds (10 years)
pub const MAX_QUOTE_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Key namespace owned by the quote store
pub const QUOTE_KEY_PREFIX: &str = "quote";
