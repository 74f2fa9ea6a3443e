//! GetOwnProfile - Query handler returning the caller's full profile record.
//!
//! Unlike the aggregated view, this bypasses the sharing policy, so the
//! caller must be the owner.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, Username};
use crate::domain::holistic::HolisticProfile;
use crate::ports::HolisticProfileRepository;

use super::update_sharing_policy::PERMISSION_DENIED;

/// Query for an owner's own profile record.
#[derive(Debug, Clone)]
pub struct GetOwnProfileQuery {
    pub caller: Username,
    pub username: Username,
}

/// Handler for reading one's own profile.
pub struct GetOwnProfileHandler {
    repository: Arc<dyn HolisticProfileRepository>,
}

impl GetOwnProfileHandler {
    pub fn new(repository: Arc<dyn HolisticProfileRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetOwnProfileQuery) -> Result<HolisticProfile, DomainError> {
        if query.caller != query.username {
            return Err(DomainError::new(ErrorCode::Unauthorized, PERMISSION_DENIED));
        }

        self.repository
            .find_by_username(&query.username)
            .await?
            .ok_or_else(|| DomainError::not_found("Username not found."))
    }
}
