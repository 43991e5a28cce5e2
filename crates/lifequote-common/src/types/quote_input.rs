//! Quote Input - applicant attributes submitted for pricing
//!
//! A `QuoteInput` is ephemeral: it is validated, priced, and discarded.
//! Only the resulting [`Quote`](super::quote::Quote) is persisted.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::{MAX_AGE, MAX_COVERAGE_AMOUNT, MIN_AGE, MIN_COVERAGE_AMOUNT};

/// Applicant gender used for rate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// Any other wire value; rejected by validation, priced on the male column
    #[serde(other)]
    Unrecognized,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Applicant smoking history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmokingStatus {
    /// Never smoked (x1.0)
    NonSmoker,
    /// Current smoker (x2.0)
    Smoker,
    /// Quit smoking (x1.3)
    FormerSmoker,
}

impl Default for SmokingStatus {
    fn default() -> Self {
        SmokingStatus::NonSmoker
    }
}

impl std::fmt::Display for SmokingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SmokingStatus::NonSmoker => write!(f, "non-smoker"),
            SmokingStatus::Smoker => write!(f, "smoker"),
            SmokingStatus::FormerSmoker => write!(f, "former-smoker"),
        }
    }
}

/// Request for a premium quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteInput {
    /// Applicant age in years (18-80)
    pub age: u8,

    /// Applicant gender
    pub gender: Gender,

    /// Requested coverage in dollars (10,000 - 5,000,000)
    pub coverage_amount: Decimal,

    /// Declared health conditions, free text
    pub health_conditions: Vec<String>,

    /// Smoking history
    pub smoking_status: SmokingStatus,
}

impl QuoteInput {
    /// Create a new quote input for a non-smoker with no declared conditions
    pub fn new(age: u8, gender: Gender, coverage_amount: Decimal) -> Self {
        Self {
            age,
            gender,
            coverage_amount,
            health_conditions: Vec::new(),
            smoking_status: SmokingStatus::default(),
        }
    }

    /// Set smoking status
    pub fn with_smoking_status(mut self, status: SmokingStatus) -> Self {
        self.smoking_status = status;
        self
    }

    /// Add a declared health condition
    pub fn with_health_condition(mut self, condition: impl Into<String>) -> Self {
        self.health_conditions.push(condition.into());
        self
    }

    /// Check the input against its domain constraints.
    ///
    /// Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(ValidationError::AgeOutOfRange {
                actual: self.age,
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }

        let min = Decimal::from(MIN_COVERAGE_AMOUNT);
        let max = Decimal::from(MAX_COVERAGE_AMOUNT);
        if self.coverage_amount < min || self.coverage_amount > max {
            return Err(ValidationError::CoverageOutOfRange {
                actual: self.coverage_amount,
                min,
                max,
            });
        }

        if self.gender == Gender::Unrecognized {
            return Err(ValidationError::UnknownGender);
        }

        Ok(())
    }
}
