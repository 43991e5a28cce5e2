//! Core data types for LifeQuote

pub mod quote;
pub mod quote_input;
