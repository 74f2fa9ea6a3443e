//! Application wiring - builds handlers and the router from port implementations.

use std::sync::Arc;

use axum::Router;

use crate::adapters::http::{api_router, AuthState, ProfileHandlers};
use crate::application::{
    GetHolisticProfileHandler, GetOwnProfileHandler, SearchProfilesHandler,
    UpdateSharingPolicyHandler,
};
use crate::config::ServerConfig;
use crate::ports::{HolisticProfileRepository, PersonalDataReader};

/// Port implementations the service runs on.
#[derive(Clone)]
pub struct AppPorts {
    pub profiles: Arc<dyn HolisticProfileRepository>,
    pub personal_data: Arc<dyn PersonalDataReader>,
    pub sessions: AuthState,
}

/// Builds the HTTP application over the given ports.
pub fn build_app(ports: AppPorts, server: &ServerConfig) -> Router {
    let handlers = ProfileHandlers::new(
        Arc::new(GetHolisticProfileHandler::new(
            ports.profiles.clone(),
            ports.personal_data.clone(),
        )),
        Arc::new(GetOwnProfileHandler::new(ports.profiles.clone())),
        Arc::new(SearchProfilesHandler::new(ports.profiles.clone())),
        Arc::new(UpdateSharingPolicyHandler::new(ports.profiles)),
    );

    api_router(handlers, ports.sessions, server)
}
