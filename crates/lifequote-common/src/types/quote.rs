//! Quote Types - the persisted premium quote
//!
//! A quote is created once, stored under `quote:{quote_id}` for a fixed
//! retention window, and never mutated afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque quote identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for QuoteId {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Underwriting bucket reported with a quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskClass {
    /// Young, non-smoking, no declared conditions
    Preferred,
    /// Older applicant or some declared conditions
    Standard,
    /// Smoker or more than two declared conditions
    High,
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskClass::Preferred => write!(f, "PREFERRED"),
            RiskClass::Standard => write!(f, "STANDARD"),
            RiskClass::High => write!(f, "HIGH"),
        }
    }
}

/// Output of the pricing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumBreakdown {
    /// Monthly premium, rounded to cents
    pub monthly_premium: Decimal,
    /// Annual premium, rounded to cents
    pub annual_premium: Decimal,
    /// Assigned risk class
    pub risk_class: RiskClass,
}

/// Persisted premium quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Unique quote identifier
    pub quote_id: QuoteId,

    /// Monthly premium in dollars
    pub monthly_premium: Decimal,

    /// Annual premium in dollars
    pub annual_premium: Decimal,

    /// Echo of the requested coverage
    pub coverage_amount: Decimal,

    /// Assigned risk class
    pub risk_class: RiskClass,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// End of the retention window
    pub expires_at: DateTime<Utc>,
}

impl Quote {
    /// Assemble a quote from a pricing result
    pub fn new(
        quote_id: QuoteId,
        breakdown: PremiumBreakdown,
        coverage_amount: Decimal,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            quote_id,
            monthly_premium: breakdown.monthly_premium,
            annual_premium: breakdown.annual_premium,
            coverage_amount,
            risk_class: breakdown.risk_class,
            created_at,
            expires_at,
        }
    }

    /// Whether the retention window has passed at `now`.
    ///
    /// Informational only; retrievability is governed by the backend TTL.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
