//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod profile;

pub use profile::{
    GetHolisticProfileHandler, GetHolisticProfileQuery, GetOwnProfileHandler, GetOwnProfileQuery,
    SearchProfilesHandler, SearchProfilesQuery, UpdateSharingPolicyCommand,
    UpdateSharingPolicyHandler, UpdateSharingPolicyResult, PERMISSION_DENIED,
};
