//! Base rate table
//!
//! Annual rate per $1000 of coverage, keyed by gender column and age band.
//!
//! | band  | male | female |
//! |-------|------|--------|
//! | 18-30 | 0.8  | 0.7    |
//! | 31-45 | 1.2  | 1.0    |
//! | 46-60 | 2.5  | 2.0    |
//! | 61-80 | 4.5  | 3.5    |

use lifequote_common::Gender;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Age interval used for rate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBand {
    /// 18-30
    YoungAdult,
    /// 31-45
    Adult,
    /// 46-60
    MiddleAge,
    /// 61-80
    Senior,
}

impl AgeBand {
    /// Classify an age. Ages below 18 land in the first band and ages
    /// above 80 in the last; range checks belong to validation.
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=30 => AgeBand::YoungAdult,
            31..=45 => AgeBand::Adult,
            46..=60 => AgeBand::MiddleAge,
            _ => AgeBand::Senior,
        }
    }

    /// Band label as quoted in rate sheets
    pub fn label(&self) -> &'static str {
        match self {
            AgeBand::YoungAdult => "18-30",
            AgeBand::Adult => "31-45",
            AgeBand::MiddleAge => "46-60",
            AgeBand::Senior => "61-80",
        }
    }
}

impl std::fmt::Display for AgeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rate table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateColumn {
    Male,
    Female,
}

impl From<Gender> for RateColumn {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Female => RateColumn::Female,
            // Unrecognized values fall back to the male column
            Gender::Male | Gender::Unrecognized => RateColumn::Male,
        }
    }
}

/// Look up the annual rate per $1000 of coverage
pub fn base_rate(gender: Gender, age: u8) -> Decimal {
    match (RateColumn::from(gender), AgeBand::from_age(age)) {
        (RateColumn::Male, AgeBand::YoungAdult) => dec!(0.8),
        (RateColumn::Male, AgeBand::Adult) => dec!(1.2),
        (RateColumn::Male, AgeBand::MiddleAge) => dec!(2.5),
        (RateColumn::Male, AgeBand::Senior) => dec!(4.5),
        (RateColumn::Female, AgeBand::YoungAdult) => dec!(0.7),
        (RateColumn::Female, AgeBand::Adult) => dec!(1.0),
        (RateColumn::Female, AgeBand::MiddleAge) => dec!(2.0),
        (RateColumn::Female, AgeBand::Senior) => dec!(3.5),
    }
}
