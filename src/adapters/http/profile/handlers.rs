//! HTTP handlers for profile endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::profile::{
    GetHolisticProfileHandler, GetHolisticProfileQuery, GetOwnProfileHandler, GetOwnProfileQuery,
    SearchProfilesHandler, SearchProfilesQuery, UpdateSharingPolicyCommand,
    UpdateSharingPolicyHandler, PERMISSION_DENIED,
};
use crate::domain::foundation::{CommandMetadata, DomainError, ErrorCode, Username};
use crate::domain::holistic::{CategorySelector, PolicyUpdate, QueryFilter};

use super::dto::{
    AuthResponse, ErrorResponse, OwnProfileResponse, ProfileQueryParams, SearchParams,
    UsernameRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct ProfileHandlers {
    get_profile_handler: Arc<GetHolisticProfileHandler>,
    get_own_profile_handler: Arc<GetOwnProfileHandler>,
    search_handler: Arc<SearchProfilesHandler>,
    update_policy_handler: Arc<UpdateSharingPolicyHandler>,
}

impl ProfileHandlers {
    pub fn new(
        get_profile_handler: Arc<GetHolisticProfileHandler>,
        get_own_profile_handler: Arc<GetOwnProfileHandler>,
        search_handler: Arc<SearchProfilesHandler>,
        update_policy_handler: Arc<UpdateSharingPolicyHandler>,
    ) -> Self {
        Self {
            get_profile_handler,
            get_own_profile_handler,
            search_handler,
            update_policy_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/profile/:username - Aggregated, policy-gated profile view
pub async fn get_holistic_profile(
    State(handlers): State<ProfileHandlers>,
    Path(username): Path<String>,
    Query(params): Query<ProfileQueryParams>,
) -> Response {
    // A name that cannot be valid cannot have a profile either
    let Ok(username) = Username::new(username) else {
        return handle_profile_error(DomainError::not_found("Username not found."));
    };

    let selector = match params
        .c
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("all")
        .parse::<CategorySelector>()
    {
        Ok(selector) => selector,
        Err(e) => return handle_profile_error(e),
    };

    let parsed = QueryFilter::parse(
        params.l.as_deref(),
        params.from_date.as_deref(),
        params.to_date.as_deref(),
    );
    for rejected in &parsed.rejected {
        tracing::warn!(username = %username, error = %rejected, "ignoring malformed filter parameter");
    }

    let query = GetHolisticProfileQuery {
        username,
        selector,
        filter: parsed.filter,
    };

    match handlers.get_profile_handler.handle(query).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => handle_profile_error(e),
    }
}

/// POST /api/user/config - Update the caller's sharing flags
///
/// Flags arrive as `shareX` query parameters; the body names the target.
pub async fn update_sharing_config(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
    Query(update): Query<PolicyUpdate>,
    body: Option<Json<UsernameRequest>>,
) -> Response {
    let Some(username) = target_username(body) else {
        return handle_profile_error(DomainError::new(ErrorCode::Unauthorized, PERMISSION_DENIED));
    };

    let cmd = UpdateSharingPolicyCommand { username, update };
    let metadata = CommandMetadata::new(user.username)
        .with_correlation_id(uuid::Uuid::new_v4().to_string())
        .with_source("http");

    match handlers.update_policy_handler.handle(cmd, metadata).await {
        Ok(_) => (StatusCode::OK, Json(AuthResponse::ok())).into_response(),
        Err(e) => handle_profile_error(e),
    }
}

/// POST /api/user - The caller's own full profile record
pub async fn get_own_profile(
    State(handlers): State<ProfileHandlers>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<UsernameRequest>>,
) -> Response {
    let Some(username) = target_username(body) else {
        return handle_profile_error(DomainError::new(ErrorCode::Unauthorized, PERMISSION_DENIED));
    };

    let query = GetOwnProfileQuery {
        caller: user.username,
        username,
    };

    match handlers.get_own_profile_handler.handle(query).await {
        Ok(profile) => (StatusCode::OK, Json(OwnProfileResponse::from(profile))).into_response(),
        Err(e) => handle_profile_error(e),
    }
}

/// GET /api/profiles?username= - Usernames containing a fragment
pub async fn search_profiles(
    State(handlers): State<ProfileHandlers>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = SearchProfilesQuery {
        fragment: params.username,
    };

    match handlers.search_handler.handle(query).await {
        Ok(usernames) => {
            let names: Vec<String> = usernames.into_iter().map(String::from).collect();
            (StatusCode::OK, Json(names)).into_response()
        }
        Err(e) => handle_profile_error(e),
    }
}

/// Username named by an authenticated request body.
///
/// A missing, malformed or invalid body names nobody, so it can never match
/// the caller.
fn target_username(body: Option<Json<UsernameRequest>>) -> Option<Username> {
    body.and_then(|Json(req)| Username::new(req.username).ok())
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_profile_error(error: DomainError) -> Response {
    match error.code() {
        ErrorCode::NotFound => (
            StatusCode::NOT_FOUND,
            Json(AuthResponse::granted(error.message())),
        )
            .into_response(),
        ErrorCode::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(AuthResponse::denied(error.message())),
        )
            .into_response(),
        code @ (ErrorCode::ValidationFailed
        | ErrorCode::InvalidCategory
        | ErrorCode::InvalidFilter) => (
            StatusCode::BAD_REQUEST,
            Json(
                ErrorResponse::bad_request(code.to_string(), error.message())
                    .with_details(error.details.clone()),
            ),
        )
            .into_response(),
        ErrorCode::SourceUnavailable => {
            tracing::error!(%error, "profile source unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::unavailable("Information temporarily unavailable")),
            )
                .into_response()
        }
        ErrorCode::DatabaseError | ErrorCode::InternalError => {
            tracing::error!(%error, "profile request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("An unexpected error occurred")),
            )
                .into_response()
        }
    }
}
