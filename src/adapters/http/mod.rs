//! HTTP adapters - REST API implementations.
//!
//! `api_router` assembles the profile routes, the health probe and the
//! cross-cutting layers (timeout, CORS, tracing, request ids). Session
//! auth is layered per route in `profile_routes`.

pub mod middleware;
pub mod profile;

pub use middleware::{auth_middleware, AuthState, RequireAuth};
pub use profile::{profile_routes, ProfileHandlers};

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;

/// GET /health - Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins = server.cors_origins_list();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full application router.
pub fn api_router(handlers: ProfileHandlers, auth: AuthState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(profile_routes(handlers, auth))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
