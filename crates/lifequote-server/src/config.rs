//! Server configuration

use lifequote_common::{QuoteError, MAX_QUOTE_TTL_SECS, QUOTE_KEY_PREFIX, QUOTE_TTL_SECS};
use lifequote_quotes::redact_url;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key-value backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Redis,
    Memory,
}

impl FromStr for BackendKind {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(BackendKind::Redis),
            "memory" => Ok(BackendKind::Memory),
            other => Err(QuoteError::Config(format!(
                "unknown backend '{}', expected redis or memory",
                other
            ))),
        }
    }
}

/// LifeQuote service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Backend selection
    pub backend: BackendKind,
    /// Redis connection settings
    pub redis: RedisSettings,
    /// Quote persistence settings
    pub quotes: QuoteSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend: BackendKind::Redis,
            redis: RedisSettings::default(),
            quotes: QuoteSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self, QuoteError> {
        // Try to load .env file
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuoteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("LIFEQUOTE_HOST") {
            cfg.host = host;
        }
        if let Some(port) = lookup("LIFEQUOTE_PORT") {
            cfg.port = parse_var("LIFEQUOTE_PORT", &port)?;
        }
        // Platform-assigned PORT takes priority
        if let Some(port) = lookup("PORT") {
            cfg.port = parse_var("PORT", &port)?;
        }

        if let Some(backend) = lookup("LIFEQUOTE_BACKEND") {
            cfg.backend = backend.parse()?;
        }

        // Redis settings
        if let Some(url) = lookup("REDIS_URL") {
            cfg.redis.url = url;
        } else {
            let host = lookup("REDIS_HOST").unwrap_or_else(|| RedisSettings::DEFAULT_HOST.to_string());
            let port: u16 = match lookup("REDIS_PORT") {
                Some(port) => parse_var("REDIS_PORT", &port)?,
                None => RedisSettings::DEFAULT_PORT,
            };
            cfg.redis.url = format!("redis://{}:{}", host, port);
        }

        // Quote settings
        if let Some(ttl) = lookup("LIFEQUOTE_QUOTE_TTL_SECS") {
            cfg.quotes.ttl_secs = parse_var("LIFEQUOTE_QUOTE_TTL_SECS", &ttl)?;
            if cfg.quotes.ttl_secs == 0 || cfg.quotes.ttl_secs > MAX_QUOTE_TTL_SECS {
                return Err(QuoteError::Config(format!(
                    "LIFEQUOTE_QUOTE_TTL_SECS must be between 1 and {}",
                    MAX_QUOTE_TTL_SECS
                )));
            }
        }
        if let Some(prefix) = lookup("LIFEQUOTE_KEY_PREFIX") {
            cfg.quotes.key_prefix = prefix;
        }

        Ok(cfg)
    }

    /// Listen address as `host:port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Redis connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct RedisSettings {
    /// Redis connection URL
    pub url: String,
}

impl RedisSettings {
    pub const DEFAULT_HOST: &'static str = "localhost";
    pub const DEFAULT_PORT: u16 = 6380;
}

// Credentials in the URL never reach logs
impl fmt::Debug for RedisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSettings")
            .field("url", &redact_url(&self.url))
            .finish()
    }
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: format!("redis://{}:{}", Self::DEFAULT_HOST, Self::DEFAULT_PORT),
        }
    }
}

/// Quote persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Time-to-live for stored quotes
    pub ttl_secs: u64,
    /// Key namespace
    pub key_prefix: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        Self {
            ttl_secs: QUOTE_TTL_SECS,
            key_prefix: QUOTE_KEY_PREFIX.to_string(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, QuoteError> {
    value
        .trim()
        .parse()
        .map_err(|_| QuoteError::Config(format!("invalid value for {}: '{}'", name, value)))
}
