//! In-process key-value backend
//!
//! DashMap-backed store with per-entry deadlines. Used for tests and
//! single-node development; entries past their deadline read as absent and
//! are dropped on access.

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::backend::{BackendError, KeyValueBackend};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    deadline: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.deadline
    }
}

/// In-memory backend with TTL semantics
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: DashMap<String, Entry>,
    offline: AtomicBool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an outage: every call fails with `Unavailable` while set
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Write a raw value, bypassing any serialization done by callers
    pub fn insert_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), BackendError> {
        let deadline = deadline_after(Instant::now(), ttl)?;
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                deadline,
            },
        );
        Ok(())
    }

    /// Remaining time-to-live of a live key
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.deadline - now)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<(), BackendError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("in-memory backend offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueBackend for InMemoryBackend {
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError> {
        self.check_online()?;
        self.insert_raw(key, value, Duration::from_secs(ttl_secs))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        self.check_online()?;
        let now = Instant::now();

        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };

        if expired {
            self.entries.remove_if(key, |_, entry| !entry.is_live(now));
            debug!(key, "Purged expired entry");
        }
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        self.check_online()?;
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .map(|(_, entry)| entry.is_live(now))
            .unwrap_or(false))
    }

    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, BackendError> {
        self.check_online()?;
        let now = Instant::now();
        match self.entries.get_mut(key) {
            Some(mut entry) if entry.is_live(now) => {
                entry.deadline = deadline_after(now, Duration::from_secs(ttl_secs))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), BackendError> {
        self.check_online()
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

fn deadline_after(now: Instant, ttl: Duration) -> Result<Instant, BackendError> {
    now.checked_add(ttl)
        .ok_or_else(|| BackendError::Command(format!("TTL of {}s out of range", ttl.as_secs())))
}
