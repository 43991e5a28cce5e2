//! LifeQuote REST service
//!
//! Wires the pricing engine and quote store behind an axum router.

pub mod api;
pub mod config;

pub use api::{router, ApiError, AppState};
pub use config::{BackendKind, ServerConfig};
