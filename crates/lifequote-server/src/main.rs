//! LifeQuote Service Binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use prometheus::Registry;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lifequote_common::VERSION;
use lifequote_quotes::{InMemoryBackend, KeyValueBackend, QuoteMetrics, QuoteStore, RedisBackend};
use lifequote_server::{router, AppState, BackendKind, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting LifeQuote server v{}", VERSION);

    let config = ServerConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let registry = Registry::new();
    let metrics = QuoteMetrics::new()?;
    metrics.register(&registry)?;

    let mut redis = None;
    let backend: Arc<dyn KeyValueBackend> = match config.backend {
        BackendKind::Redis => {
            let backend = Arc::new(RedisBackend::open(&config.redis.url)?);
            // Keep serving when Redis is down at startup; calls reconnect lazily
            match backend.ping().await {
                Ok(()) => info!("Redis reachable"),
                Err(e) => error!(error = %e, "Redis unreachable at startup"),
            }
            redis = Some(backend.clone());
            backend
        }
        BackendKind::Memory => {
            warn!("Using in-memory backend, quotes are lost on restart");
            Arc::new(InMemoryBackend::new())
        }
    };

    let store = QuoteStore::new(backend)
        .with_prefix(&config.quotes.key_prefix)
        .with_ttl_secs(config.quotes.ttl_secs)
        .with_metrics(metrics);
    info!(
        "Quote store ready: backend={}, ttl={}s",
        store.backend_name(),
        store.ttl_secs()
    );

    let app = router(AppState::new(store, registry));

    let addr: SocketAddr = config.listen_addr().parse()?;
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API listening on {}", addr);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    if let Some(redis) = redis {
        redis.close().await;
    }

    info!("Shutting down LifeQuote server");
    Ok(())
}
