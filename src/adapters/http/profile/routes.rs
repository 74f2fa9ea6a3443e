//! HTTP routes for profile endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::middleware::{auth_middleware, AuthState};

use super::handlers::{
    get_holistic_profile, get_own_profile, search_profiles, update_sharing_config,
    ProfileHandlers,
};

/// Creates the profile router with all endpoints.
///
/// Session tokens are only validated on the `/api/user` routes; the
/// public reads ignore any `Authorization` header.
pub fn profile_routes(handlers: ProfileHandlers, auth: AuthState) -> Router {
    let owner_routes = Router::new()
        .route("/api/user", post(get_own_profile))
        .route("/api/user/config", post(update_sharing_config))
        .route_layer(axum::middleware::from_fn_with_state(auth, auth_middleware));

    Router::new()
        .route("/api/profile/:username", get(get_holistic_profile))
        .route("/api/profiles", get(search_profiles))
        .merge(owner_routes)
        .with_state(handlers)
}
