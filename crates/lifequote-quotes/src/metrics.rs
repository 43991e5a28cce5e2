//! Prometheus metrics for the quote store

use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

/// Lookup outcome label values
pub const LOOKUP_HIT: &str = "hit";
pub const LOOKUP_MISS: &str = "miss";
pub const LOOKUP_CORRUPT: &str = "corrupt";

/// Quote store counters
#[derive(Clone)]
pub struct QuoteMetrics {
    pub quotes_created: IntCounter,
    pub quote_lookups: IntCounterVec,
    pub backend_errors: IntCounter,
}

impl QuoteMetrics {
    pub fn new() -> prometheus::Result<Self> {
        Ok(Self {
            quotes_created: IntCounter::new(
                "lifequote_quotes_created_total",
                "Total quotes priced and stored",
            )?,
            quote_lookups: IntCounterVec::new(
                Opts::new("lifequote_quote_lookups_total", "Quote lookups by outcome"),
                &["outcome"],
            )?,
            backend_errors: IntCounter::new(
                "lifequote_backend_errors_total",
                "Total key-value backend failures",
            )?,
        })
    }

    pub fn register(&self, registry: &Registry) -> prometheus::Result<()> {
        registry.register(Box::new(self.quotes_created.clone()))?;
        registry.register(Box::new(self.quote_lookups.clone()))?;
        registry.register(Box::new(self.backend_errors.clone()))?;
        Ok(())
    }

    pub(crate) fn record_lookup(&self, outcome: &str) {
        self.quote_lookups.with_label_values(&[outcome]).inc();
    }
}
