//! REST API layer: route handlers, DTOs, envelopes and router composition.
//!
//! Resource endpoints live at the root (`/persons`, `/events`). With the
//! `swagger-ui` feature, interactive docs are served at `/docs`; the raw
//! document is always available at `/openapi.json`.

pub mod dto;
pub mod envelope;
pub mod extract;
pub mod handlers;
pub mod messages;
pub mod openapi;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::error::expose_error_details;
use crate::persistence::Repository;

/// Builds the router with every REST endpoint, before state is attached.
pub fn build_router<R: Repository>() -> Router<AppState<R>> {
    Router::new()
        .merge(handlers::routes::<R>())
        .merge(handlers::system::routes())
        .merge(docs_routes())
}

/// Builds the complete application: routes, docs, envelope fallbacks for
/// unknown routes and methods, tracing, CORS and the error-details policy
/// from `state`.
pub fn build_app<R: Repository>(state: AppState<R>) -> Router {
    let show_error_details = state.show_error_details;
    build_router::<R>()
        .fallback(handlers::system::not_found_fallback)
        .method_not_allowed_fallback(handlers::system::method_not_allowed_fallback)
        .layer(from_fn_with_state(show_error_details, expose_error_details))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(feature = "swagger-ui")]
fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new("/docs").url("/openapi.json", openapi::ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    use axum::Json;
    use axum::routing::get;
    use utoipa::OpenApi;

    Router::new().route(
        "/openapi.json",
        get(|| async { Json(openapi::ApiDoc::openapi()) }),
    )
}
