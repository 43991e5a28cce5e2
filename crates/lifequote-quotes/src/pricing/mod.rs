//! Pricing module
//!
//! Pure premium calculation with:
//! - Gender x age band base rates
//! - Smoking and health condition multipliers
//! - Risk classification

pub mod engine;
pub mod rate_table;

pub use engine::{
    health_multiplier, risk_class, risk_condition_count, round_cents, smoking_factor,
    PricingEngine, RISK_CONDITIONS,
};
pub use rate_table::{base_rate, AgeBand, RateColumn};
