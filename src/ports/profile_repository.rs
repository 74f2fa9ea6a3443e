//! HolisticProfileRepository port for profile records and their policy.

use async_trait::async_trait;

use crate::domain::{
    foundation::{DomainError, Username},
    holistic::HolisticProfile,
};

/// Repository for profile records.
///
/// A profile record holds the profile-embedded facets (demographics,
/// personalities, empathies) and the owner's sharing policy.
#[async_trait]
pub trait HolisticProfileRepository: Send + Sync {
    /// Find a profile by its owner's username
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<HolisticProfile>, DomainError>;

    /// Usernames containing `fragment`, case-insensitive, in username order
    async fn search_usernames(&self, fragment: &str) -> Result<Vec<Username>, DomainError>;

    /// Persist the profile's current policy and version.
    ///
    /// Last write wins: concurrent updates by the same owner are not
    /// ordered against each other.
    async fn save_policy(&self, profile: &HolisticProfile) -> Result<(), DomainError>;
}
