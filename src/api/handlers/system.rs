//! System endpoints: greeting, health check, crash test.

use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::envelope::{Envelope, NoData, custom_response};
use crate::api::messages;
use crate::error::ApiError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /`: Plain-text greeting with the server time.
#[utoipa::path(
    get,
    path = "/",
    tag = "System",
    summary = "Greeting",
    responses(
        (status = 200, description = "`Hello, World!` followed by the current UTC time (RFC 3339)", body = String, content_type = "text/plain"),
    )
)]
pub async fn home_handler() -> String {
    format!("Hello, World! {}", Utc::now().to_rfc3339())
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /crash_test`: Always fails, to check error reporting end to end.
///
/// # Errors
///
/// Always returns [`ApiError::Internal`].
#[utoipa::path(
    get,
    path = "/crash_test",
    tag = "System",
    summary = "Crash test",
    responses(
        (status = 500, description = "Always", body = Envelope<NoData>),
    )
)]
pub async fn crash_test_handler() -> Result<Envelope<NoData>, ApiError> {
    Err(ApiError::Internal("Crash test".to_string()))
}

/// Fallback for paths no route matches.
pub async fn not_found_fallback(uri: Uri) -> Envelope<NoData> {
    custom_response(
        None,
        messages::route_not_found_message(uri.path()),
        StatusCode::NOT_FOUND,
    )
}

/// Fallback for known paths requested with a method they do not serve.
pub async fn method_not_allowed_fallback(method: Method, uri: Uri) -> Envelope<NoData> {
    custom_response(
        None,
        messages::method_not_allowed_message(method, uri.path()),
        StatusCode::METHOD_NOT_ALLOWED,
    )
}

/// System routes, independent of application state.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .route("/crash_test", get(crash_test_handler))
}
