//! Redis key-value backend
//!
//! Holds one multiplexed connection shared by all callers. The handle has
//! an explicit lifecycle: [`RedisBackend::open`] on startup, optional
//! [`RedisBackend::connect`] to fail fast, [`RedisBackend::close`] on
//! shutdown. A dropped connection is re-established once per call.

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::backend::{BackendError, KeyValueBackend};

/// Redis-backed key-value store
pub struct RedisBackend {
    /// Redis client
    client: Client,
    /// Shared multiplexed connection, created on first use
    connection: Arc<RwLock<Option<MultiplexedConnection>>>,
    /// Set once the handle has been released
    closed: AtomicBool,
}

impl RedisBackend {
    /// Create a backend handle without connecting
    pub fn open(redis_url: &str) -> Result<Self, BackendError> {
        let client = Client::open(redis_url)
            .map_err(|e| BackendError::Command(format!("invalid Redis URL: {}", e)))?;

        Ok(Self {
            client,
            connection: Arc::new(RwLock::new(None)),
            closed: AtomicBool::new(false),
        })
    }

    /// Create a backend handle and establish the connection
    pub async fn connect(redis_url: &str) -> Result<Self, BackendError> {
        let backend = Self::open(redis_url)?;
        backend.get_connection().await?;
        info!(url = %redact_url(redis_url), "Connected to Redis");
        Ok(backend)
    }

    /// Release the connection. Later calls fail with `Unavailable`.
    pub async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let mut guard = self.connection.write().await;
        if guard.take().is_some() {
            info!("Redis connection released");
        }
    }

    /// Get the shared connection, reconnecting if none is cached
    async fn get_connection(&self) -> Result<MultiplexedConnection, BackendError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("Redis backend closed".to_string()));
        }

        let guard = self.connection.read().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }
        drop(guard);

        let mut guard = self.connection.write().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let connection = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| BackendError::Unavailable(format!("failed to connect to Redis: {}", e)))?;

        *guard = Some(connection.clone());
        Ok(connection)
    }

    /// Map a command error, discarding the cached connection if it is dead
    async fn command_failed(&self, op: &str, err: RedisError) -> BackendError {
        warn!(op, error = %err, "Redis command failed");

        if is_connectivity_error(&err) {
            self.connection.write().await.take();
            BackendError::Unavailable(format!("Redis {} failed: {}", op, err))
        } else {
            BackendError::Command(format!("Redis {} failed: {}", op, err))
        }
    }
}

#[async_trait]
impl KeyValueBackend for RedisBackend {
    #[instrument(skip(self, value))]
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), BackendError> {
        let mut conn = self.get_connection().await?;

        match redis::cmd("SETEX")
            .arg(key)
            .arg(ttl_secs)
            .arg(value)
            .query_async::<_, ()>(&mut conn)
            .await
        {
            Ok(()) => {
                debug!(key, ttl_secs, "Stored value");
                Ok(())
            }
            Err(e) => Err(self.command_failed("SETEX", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.get_connection().await?;

        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.command_failed("GET", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<bool, BackendError> {
        let mut conn = self.get_connection().await?;

        match conn.del::<_, u64>(key).await {
            Ok(removed) => Ok(removed > 0),
            Err(e) => Err(self.command_failed("DEL", e).await),
        }
    }

    #[instrument(skip(self))]
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, BackendError> {
        let mut conn = self.get_connection().await?;

        match redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl_secs)
            .query_async::<_, i64>(&mut conn)
            .await
        {
            Ok(updated) => Ok(updated == 1),
            Err(e) => Err(self.command_failed("EXPIRE", e).await),
        }
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let mut conn = self.get_connection().await?;

        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(_) => Ok(()),
            Err(e) => Err(self.command_failed("PING", e).await),
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

fn is_connectivity_error(err: &RedisError) -> bool {
    err.is_io_error() || err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped()
}

/// Strip credentials from a Redis URL for logging
pub fn redact_url(redis_url: &str) -> String {
    match redis_url.rsplit_once('@') {
        Some((scheme_and_auth, host)) => {
            let scheme = scheme_and_auth.split("://").next().unwrap_or("redis");
            format!("{}://***@{}", scheme, host)
        }
        None => redis_url.to_string(),
    }
}
