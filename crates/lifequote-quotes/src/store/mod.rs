//! Quote persistence
//!
//! The quote store writes through to a narrow key-value backend so the same
//! logic runs over Redis in production and an in-process map in tests.

pub mod backend;
pub mod memory;
pub mod quote_store;
pub mod redis_store;

pub use backend::{BackendError, KeyValueBackend};
pub use memory::InMemoryBackend;
pub use quote_store::QuoteStore;
pub use redis_store::{redact_url, RedisBackend};
