//! REST routes for the quote service
//!
//! - `POST   /api/v1/quotes`            calculate and store a quote
//! - `GET    /api/v1/quotes/:quote_id`  fetch a stored quote
//! - `DELETE /api/v1/quotes/:quote_id`  withdraw a quote
//! - `GET    /health`                   backend reachability
//! - `GET    /metrics`                  Prometheus exposition

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use lifequote_common::{Quote, QuoteError, QuoteInput, VERSION};
use lifequote_quotes::QuoteStore;
use prometheus::{Encoder, Registry, TextEncoder};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::error;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<QuoteStore>,
    pub registry: Registry,
}

impl AppState {
    pub fn new(store: QuoteStore, registry: Registry) -> Self {
        Self {
            store: Arc::new(store),
            registry,
        }
    }
}

/// Error response wrapper
#[derive(Debug)]
pub struct ApiError(pub QuoteError);

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            QuoteError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuoteError::NotFound(_) => StatusCode::NOT_FOUND,
            QuoteError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Build the service router
pub fn router(state: AppState) -> Router {
    // CORS layer to allow browser frontends from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/v1/version", get(version))
        .route("/api/v1/quotes", post(calculate_quote))
        .route(
            "/api/v1/quotes/:quote_id",
            get(get_quote).delete(delete_quote),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn calculate_quote(
    State(state): State<AppState>,
    Json(input): Json<QuoteInput>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    let quote = state.store.create(&input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
) -> Result<Json<Quote>, ApiError> {
    match state.store.get(&quote_id).await? {
        Some(quote) => Ok(Json(quote)),
        None => Err(QuoteError::NotFound(quote_id).into()),
    }
}

async fn delete_quote(
    State(state): State<AppState>,
    Path(quote_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete(&quote_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(QuoteError::NotFound(quote_id).into())
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.store.backend_name();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "backend": backend })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "degraded", "backend": backend, "error": e.to_string() })),
        ),
    }
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&state.registry.gather(), &mut buffer)
        .map_err(|e| QuoteError::Internal(format!("failed to encode metrics: {}", e)))?;

    let body = String::from_utf8(buffer)
        .map_err(|e| QuoteError::Internal(format!("metrics not UTF-8: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], body))
}

async fn version() -> Json<serde_json::Value> {
    Json(json!({
        "service": "lifequote-server",
        "version": VERSION,
        "description": "Insurance premium quotes with a 30 day retention window",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use lifequote_quotes::{InMemoryBackend, QuoteMetrics};
    use rust_decimal_macros::dec;
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<InMemoryBackend>) {
        let backend = Arc::new(InMemoryBackend::new());
        let registry = Registry::new();
        let metrics = QuoteMetrics::new().unwrap();
        metrics.register(&registry).unwrap();

        let store = QuoteStore::new(backend.clone()).with_metrics(metrics);
        (router(AppState::new(store, registry)), backend)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, body)
    }

    fn post_quote(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/quotes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn smoker_input() -> serde_json::Value {
        json!({
            "age": 35,
            "gender": "male",
            "coverageAmount": 500000,
            "healthConditions": ["none"],
            "smokingStatus": "smoker"
        })
    }

    #[tokio::test]
    async fn test_calculate_then_fetch() {
        let (app, _) = test_app();

        let (status, created) = send(&app, post_quote(smoker_input())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["riskClass"], "HIGH");
        let annual: rust_decimal::Decimal =
            created["annualPremium"].as_str().unwrap().parse().unwrap();
        assert_eq!(annual, dec!(1200.00));

        let id = created["quoteId"].as_str().unwrap();
        let (status, fetched) = send(&app, get(&format!("/api/v1/quotes/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_validation_error_is_422() {
        let (app, backend) = test_app();
        let mut input = smoker_input();
        input["age"] = json!(17);

        let (status, body) = send(&app, post_quote(input)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("age"));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_gender_is_422() {
        let (app, _) = test_app();
        let mut input = smoker_input();
        input["gender"] = json!("other");

        let (status, _) = send(&app, post_quote(input)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_missing_quote_is_404() {
        let (app, _) = test_app();

        let (status, body) = send(&app, get("/api/v1/quotes/non-existent-uuid")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found or expired"));
    }

    #[tokio::test]
    async fn test_outage_is_503_not_404() {
        let (app, backend) = test_app();
        let (_, created) = send(&app, post_quote(smoker_input())).await;
        backend.set_offline(true);

        let id = created["quoteId"].as_str().unwrap();
        let (status, _) = send(&app, get(&format!("/api/v1/quotes/{}", id))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _) = send(&app, post_quote(smoker_input())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_delete_quote() {
        let (app, _) = test_app();
        let (_, created) = send(&app, post_quote(smoker_input())).await;
        let uri = format!("/api/v1/quotes/{}", created["quoteId"].as_str().unwrap());

        let delete = |uri: &str| {
            Request::builder()
                .method(Method::DELETE)
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        let (status, _) = send(&app, delete(&uri)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, delete(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_reflects_backend() {
        let (app, backend) = test_app();

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["backend"], "memory");

        backend.set_offline(true);
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        let (app, _) = test_app();
        send(&app, post_quote(smoker_input())).await;

        let response = app.clone().oneshot(get("/metrics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();

        assert!(text.contains("lifequote_quotes_created_total 1"));
    }
}
