//! Quote store
//!
//! Prices inputs, stamps identifiers and timestamps, and persists each quote
//! as JSON under `quote:{quote_id}` with a fixed time-to-live. The backend is
//! the system of record for the retention window; expiry is its TTL.

use chrono::{DateTime, Utc};
use lifequote_common::{
    Quote, QuoteError, QuoteInput, Result, MAX_QUOTE_TTL_SECS, QUOTE_KEY_PREFIX, QUOTE_TTL_SECS,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::backend::KeyValueBackend;
use crate::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use crate::metrics::{QuoteMetrics, LOOKUP_CORRUPT, LOOKUP_HIT, LOOKUP_MISS};
use crate::pricing::PricingEngine;

/// Creates and retrieves expiring quotes
pub struct QuoteStore {
    /// Key-value system of record
    backend: Arc<dyn KeyValueBackend>,
    /// Premium calculator
    engine: PricingEngine,
    /// Timestamp source
    clock: Arc<dyn Clock>,
    /// Identifier source
    ids: Arc<dyn IdGenerator>,
    /// Key namespace
    prefix: String,
    /// Time-to-live for stored quotes
    ttl_secs: u64,
    /// Optional counters
    metrics: Option<QuoteMetrics>,
}

impl QuoteStore {
    /// Create a store over `backend` with wall-clock time and UUID ids
    pub fn new(backend: Arc<dyn KeyValueBackend>) -> Self {
        Self {
            backend,
            engine: PricingEngine::new(),
            clock: Arc::new(SystemClock),
            ids: Arc::new(UuidGenerator),
            prefix: QUOTE_KEY_PREFIX.to_string(),
            ttl_secs: QUOTE_TTL_SECS,
            metrics: None,
        }
    }

    /// Use a custom clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a custom identifier source
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Use a custom key prefix
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    /// Use a custom time-to-live
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Record counters into `metrics`
    pub fn with_metrics(mut self, metrics: QuoteMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Backend key for a quote id
    pub fn key_for(&self, quote_id: &str) -> String {
        format!("{}:{}", self.prefix, quote_id)
    }

    /// Time-to-live applied to new quotes
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Name of the backing store
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Price and persist a quote.
    ///
    /// The quote is returned only after the backend accepted the write;
    /// invalid input is rejected before anything is priced or stored.
    #[instrument(skip(self, input), fields(age = input.age, gender = %input.gender))]
    pub async fn create(&self, input: &QuoteInput) -> Result<Quote> {
        input.validate()?;

        let quote_id = self.ids.next_id();
        let breakdown = self.engine.price(input);
        let created_at = self.clock.now();
        let expires_at = self.expiry_for(created_at)?;

        let quote = Quote::new(
            quote_id,
            breakdown,
            input.coverage_amount,
            created_at,
            expires_at,
        );

        let key = self.key_for(quote.quote_id.as_str());
        let json = serde_json::to_string(&quote)?;

        if let Err(e) = self.backend.set(&key, &json, self.ttl_secs).await {
            self.count_backend_error();
            warn!(key = %key, error = %e, "Failed to store quote");
            return Err(e.into());
        }

        if let Some(metrics) = &self.metrics {
            metrics.quotes_created.inc();
        }
        info!(
            quote_id = %quote.quote_id,
            annual_premium = %quote.annual_premium,
            risk_class = %quote.risk_class,
            "Quote created"
        );
        Ok(quote)
    }

    /// Fetch a quote by id.
    ///
    /// Missing, expired, and undeserializable records all read as `None`;
    /// only backend failures are errors.
    #[instrument(skip(self))]
    pub async fn get(&self, quote_id: &str) -> Result<Option<Quote>> {
        let key = self.key_for(quote_id);

        let stored = match self.backend.get(&key).await {
            Ok(stored) => stored,
            Err(e) => {
                self.count_backend_error();
                warn!(key = %key, error = %e, "Failed to read quote");
                return Err(e.into());
            }
        };

        let Some(json) = stored else {
            debug!(key = %key, "Quote miss");
            self.count_lookup(LOOKUP_MISS);
            return Ok(None);
        };

        match serde_json::from_str::<Quote>(&json) {
            Ok(quote) => {
                debug!(key = %key, "Quote hit");
                self.count_lookup(LOOKUP_HIT);
                Ok(Some(quote))
            }
            Err(e) => {
                let err = QuoteError::CorruptRecord {
                    key,
                    reason: e.to_string(),
                };
                warn!(error = %err, "Treating corrupt quote record as absent");
                self.count_lookup(LOOKUP_CORRUPT);
                Ok(None)
            }
        }
    }

    /// Withdraw a quote before its retention window ends
    #[instrument(skip(self))]
    pub async fn delete(&self, quote_id: &str) -> Result<bool> {
        let key = self.key_for(quote_id);

        match self.backend.delete(&key).await {
            Ok(removed) => {
                debug!(key = %key, removed, "Quote delete");
                Ok(removed)
            }
            Err(e) => {
                self.count_backend_error();
                Err(e.into())
            }
        }
    }

    /// Check backend reachability
    pub async fn ping(&self) -> Result<()> {
        self.backend.ping().await.map_err(|e| {
            self.count_backend_error();
            QuoteError::from(e)
        })
    }

    fn count_lookup(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.record_lookup(outcome);
        }
    }

    /// Expiry stamp for a quote created at `created_at`.
    ///
    /// TTLs above [`MAX_QUOTE_TTL_SECS`] are rejected before anything is written.
    fn expiry_for(&self, created_at: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let out_of_range = || {
            QuoteError::Config(format!(
                "quote TTL of {}s exceeds the {}s maximum",
                self.ttl_secs, MAX_QUOTE_TTL_SECS
            ))
        };

        if self.ttl_secs > MAX_QUOTE_TTL_SECS {
            return Err(out_of_range());
        }
        let secs = i64::try_from(self.ttl_secs).map_err(|_| out_of_range())?;
        chrono::Duration::try_seconds(secs)
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .ok_or_else(out_of_range)
    }

    fn count_backend_error(&self) {
        if let Some(metrics) = &self.metrics {
            metrics.backend_errors.inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SequentialIds};
    use crate::store::InMemoryBackend;
    use chrono::{TimeZone, Utc};
    use lifequote_common::{Gender, RiskClass, SmokingStatus};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn base_input() -> QuoteInput {
        QuoteInput::new(35, Gender::Male, dec!(500000)).with_health_condition("none")
    }

    fn test_store() -> (QuoteStore, Arc<InMemoryBackend>, Arc<FixedClock>) {
        let backend = Arc::new(InMemoryBackend::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap(),
        ));
        let store = QuoteStore::new(backend.clone())
            .with_clock(clock.clone())
            .with_id_generator(Arc::new(SequentialIds::new("test-uuid")));
        (store, backend, clock)
    }

    #[tokio::test]
    async fn test_create_stores_under_prefixed_key() {
        let (store, backend, _) = test_store();

        let quote = store.create(&base_input()).await.unwrap();

        assert_eq!(quote.quote_id.as_str(), "test-uuid-1");
        let stored = backend.get("quote:test-uuid-1").await.unwrap().unwrap();
        assert_eq!(stored, serde_json::to_string(&quote).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_uses_thirty_day_ttl() {
        let (store, backend, _) = test_store();

        let quote = store.create(&base_input()).await.unwrap();

        assert_eq!(
            backend.remaining_ttl(&store.key_for(quote.quote_id.as_str())),
            Some(Duration::from_secs(2_592_000))
        );
    }

    #[tokio::test]
    async fn test_create_stamps_timestamps() {
        let (store, _, clock) = test_store();

        let quote = store.create(&base_input()).await.unwrap();

        assert_eq!(quote.created_at, clock.now());
        assert_eq!(quote.expires_at, clock.now() + chrono::Duration::days(30));
    }

    #[tokio::test]
    async fn test_timestamps_follow_clock() {
        let (store, _, clock) = test_store();

        let first = store.create(&base_input()).await.unwrap();
        clock.advance(chrono::Duration::hours(6));
        let second = store.create(&base_input()).await.unwrap();

        assert_eq!(second.created_at - first.created_at, chrono::Duration::hours(6));
        assert_eq!(second.expires_at - first.expires_at, chrono::Duration::hours(6));
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_rejected() {
        for ttl_secs in [MAX_QUOTE_TTL_SECS + 1, 10_000_000_000_000_000, u64::MAX] {
            let (store, backend, _) = test_store();
            let store = store.with_ttl_secs(ttl_secs);

            let err = store.create(&base_input()).await.unwrap_err();

            assert!(matches!(err, QuoteError::Config(_)), "ttl {ttl_secs}: {err:?}");
            assert!(backend.is_empty());
        }
    }

    #[tokio::test]
    async fn test_maximum_ttl_is_accepted() {
        let (store, _, clock) = test_store();
        let store = store.with_ttl_secs(MAX_QUOTE_TTL_SECS);

        let quote = store.create(&base_input()).await.unwrap();

        assert_eq!(
            quote.expires_at,
            clock.now() + chrono::Duration::seconds(MAX_QUOTE_TTL_SECS as i64)
        );
    }

    #[tokio::test]
    async fn test_create_prices_input() {
        let (store, _, _) = test_store();

        let input = base_input().with_smoking_status(SmokingStatus::Smoker);
        let quote = store.create(&input).await.unwrap();

        assert_eq!(quote.annual_premium, dec!(1200.00));
        assert_eq!(quote.monthly_premium, dec!(100.00));
        assert_eq!(quote.coverage_amount, dec!(500000));
        assert_eq!(quote.risk_class, RiskClass::High);
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let (store, backend, _) = test_store();

        let input = QuoteInput { age: 81, ..base_input() };
        let err = store.create(&input).await.unwrap_err();

        assert!(err.is_validation());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_create_fails_when_backend_down() {
        let (store, backend, _) = test_store();
        backend.set_offline(true);

        let err = store.create(&base_input()).await.unwrap_err();

        assert!(err.is_backend_unavailable());
        backend.set_offline(false);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let (store, _, _) = test_store();

        let created = store.create(&base_input()).await.unwrap();
        let fetched = store.get(created.quote_id.as_str()).await.unwrap();

        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_missing_is_none() {
        let (store, _, _) = test_store();

        assert!(store.get("non-existent-uuid").await.unwrap().is_none());
        assert!(store.get("").await.unwrap().is_none());
        assert!(store.get("not a uuid / at all").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_reads_stored_record() {
        let (store, backend, _) = test_store();
        let json = r#"{
            "quoteId": "test-uuid",
            "monthlyPremium": "50.00",
            "annualPremium": "600.00",
            "coverageAmount": "500000",
            "riskClass": "PREFERRED",
            "createdAt": "2025-03-01T09:30:00Z",
            "expiresAt": "2025-03-31T09:30:00Z"
        }"#;
        backend
            .insert_raw("quote:test-uuid", json, Duration::from_secs(60))
            .unwrap();

        let quote = store.get("test-uuid").await.unwrap().unwrap();

        assert_eq!(quote.quote_id.as_str(), "test-uuid");
        assert_eq!(quote.annual_premium, dec!(600.00));
        assert_eq!(quote.risk_class, RiskClass::Preferred);
    }

    #[tokio::test]
    async fn test_corrupt_record_is_none() {
        let (store, backend, _) = test_store();
        let metrics = QuoteMetrics::new().unwrap();
        let store = store.with_metrics(metrics.clone());

        backend
            .insert_raw("quote:broken", "{not json", Duration::from_secs(60))
            .unwrap();
        backend.insert_raw(
            "quote:partial",
            r#"{"quoteId":"partial","annualPremium":"600.00"}"#,
            Duration::from_secs(60),
        )
        .unwrap();

        assert!(store.get("broken").await.unwrap().is_none());
        assert!(store.get("partial").await.unwrap().is_none());
        assert_eq!(
            metrics.quote_lookups.with_label_values(&[LOOKUP_CORRUPT]).get(),
            2
        );
    }

    #[tokio::test]
    async fn test_get_fails_when_backend_down() {
        let (store, backend, _) = test_store();
        let created = store.create(&base_input()).await.unwrap();
        backend.set_offline(true);

        let err = store.get(created.quote_id.as_str()).await.unwrap_err();

        assert!(err.is_backend_unavailable());
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, _, _) = test_store();
        let created = store.create(&base_input()).await.unwrap();
        let id = created.quote_id.as_str();

        assert!(store.delete(id).await.unwrap());
        assert!(store.get(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_custom_prefix_and_ttl() {
        let (store, backend, _) = test_store();
        let store = store.with_prefix("staging:quote").with_ttl_secs(60);

        let quote = store.create(&base_input()).await.unwrap();

        assert!(backend
            .get(&format!("staging:quote:{}", quote.quote_id))
            .await
            .unwrap()
            .is_some());
        assert_eq!(quote.expires_at - quote.created_at, chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_metrics_counts() {
        let (store, backend, _) = test_store();
        let metrics = QuoteMetrics::new().unwrap();
        let store = store.with_metrics(metrics.clone());

        let quote = store.create(&base_input()).await.unwrap();
        store.get(quote.quote_id.as_str()).await.unwrap();
        store.get("missing").await.unwrap();
        backend.set_offline(true);
        let _ = store.get("missing").await;

        assert_eq!(metrics.quotes_created.get(), 1);
        assert_eq!(metrics.quote_lookups.with_label_values(&[LOOKUP_HIT]).get(), 1);
        assert_eq!(metrics.quote_lookups.with_label_values(&[LOOKUP_MISS]).get(), 1);
        assert_eq!(metrics.backend_errors.get(), 1);
    }
}
