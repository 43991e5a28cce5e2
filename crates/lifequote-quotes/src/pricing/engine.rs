//! Premium pricing engine
//!
//! Deterministic rate/multiplier model:
//! - Base rate from the (gender, age band) table
//! - Health multiplier from smoking status and declared risk conditions
//! - Risk class from smoking status, condition count, and age

use lifequote_common::{PremiumBreakdown, QuoteInput, RiskClass, SmokingStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::rate_table::base_rate;

/// Conditions that load the health multiplier, matched case-insensitively
pub const RISK_CONDITIONS: [&str; 4] = [
    "diabetes",
    "heart-disease",
    "cancer-history",
    "high-blood-pressure",
];

/// Multiplier added per matching risk condition
const CONDITION_LOADING: Decimal = dec!(0.5);

/// Coverage unit the base rate is quoted against
const RATE_UNIT: Decimal = dec!(1000);

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Stateless premium calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingEngine;

impl PricingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Price a validated input.
    ///
    /// Both premiums are rounded from the unrounded annual figure, so the
    /// monthly value is never derived from the already-rounded annual one.
    pub fn price(&self, input: &QuoteInput) -> PremiumBreakdown {
        let rate = base_rate(input.gender, input.age);
        let multiplier = health_multiplier(&input.health_conditions, input.smoking_status);

        let annual_raw = input.coverage_amount * rate * multiplier / RATE_UNIT;

        PremiumBreakdown {
            monthly_premium: round_cents(annual_raw / MONTHS_PER_YEAR),
            annual_premium: round_cents(annual_raw),
            risk_class: risk_class(input.age, input.smoking_status, &input.health_conditions),
        }
    }
}

/// Smoking factor for a status
pub fn smoking_factor(status: SmokingStatus) -> Decimal {
    match status {
        SmokingStatus::Smoker => dec!(2.0),
        SmokingStatus::FormerSmoker => dec!(1.3),
        SmokingStatus::NonSmoker => dec!(1.0),
    }
}

/// Number of declared conditions found in [`RISK_CONDITIONS`]
pub fn risk_condition_count(conditions: &[String]) -> usize {
    conditions
        .iter()
        .filter(|condition| {
            let normalized = condition.to_lowercase();
            RISK_CONDITIONS.contains(&normalized.as_str())
        })
        .count()
}

/// Combined smoking and condition multiplier
pub fn health_multiplier(conditions: &[String], status: SmokingStatus) -> Decimal {
    let matches = Decimal::from(risk_condition_count(conditions));
    smoking_factor(status) * (Decimal::ONE + CONDITION_LOADING * matches)
}

/// Assign a risk class.
///
/// Checks run in priority order: smoking or more than two declared
/// conditions first, then age or any declared condition. The condition
/// count is the full list length, not only risk-list matches.
pub fn risk_class(age: u8, status: SmokingStatus, conditions: &[String]) -> RiskClass {
    if status == SmokingStatus::Smoker || conditions.len() > 2 {
        return RiskClass::High;
    }

    if age > 55 || !conditions.is_empty() {
        return RiskClass::Standard;
    }

    RiskClass::Preferred
}

/// Round to cents, halves away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
