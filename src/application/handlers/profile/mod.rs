//! Holistic profile handlers.

mod get_holistic_profile;
mod get_own_profile;
mod search_profiles;
mod update_sharing_policy;

pub use get_holistic_profile::{GetHolisticProfileHandler, GetHolisticProfileQuery};
pub use get_own_profile::{GetOwnProfileHandler, GetOwnProfileQuery};
pub use search_profiles::{SearchProfilesHandler, SearchProfilesQuery};
pub use update_sharing_policy::{
    UpdateSharingPolicyCommand, UpdateSharingPolicyHandler, UpdateSharingPolicyResult,
    PERMISSION_DENIED,
};
