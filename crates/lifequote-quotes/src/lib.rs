//! # LifeQuote Quotes
//!
//! Premium pricing and expiring quote persistence.
//!
//! ## Pricing Formula
//!
//! ```text
//! annual  = round2(coverage x base_rate x health_multiplier / 1000)
//! monthly = round2(coverage x base_rate x health_multiplier / 1000 / 12)
//! ```
//!
//! Where:
//! - base_rate: annual rate per $1000 from the gender x age band table
//! - health_multiplier: smoking factor x (1 + 0.5 x matching risk conditions)
//!
//! ## Persistence
//!
//! [`QuoteStore`] writes each quote as JSON under `quote:{quote_id}` with a
//! 30 day time-to-live on a [`KeyValueBackend`].

pub mod clock;
pub mod metrics;
pub mod pricing;
pub mod store;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIds, SystemClock, UuidGenerator};
pub use metrics::QuoteMetrics;
pub use pricing::{AgeBand, PricingEngine};
pub use store::{
    redact_url, BackendError, InMemoryBackend, KeyValueBackend, QuoteStore, RedisBackend,
};
