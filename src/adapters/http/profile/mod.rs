//! HTTP adapter for profile endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    AuthResponse, ErrorResponse, OwnProfileResponse, ProfileQueryParams, SearchParams,
    UsernameRequest,
};
pub use handlers::ProfileHandlers;
pub use routes::profile_routes;
