//! PersonalDataReader port - one fetcher per per-user data source.

use async_trait::async_trait;

use crate::domain::{
    foundation::{DomainError, Username},
    holistic::{
        records::{
            AffectRecord, BehaviorRecord, BodyRecord, ConnectionRecord, FoodRecord, HeartRecord,
            InterestRecord, SleepRecord,
        },
        QueryFilter,
    },
};

/// Query operations over a user's personal data sources.
///
/// # Contract
///
/// Every method:
/// - returns at most `filter.limit` records, in source insertion order
/// - applies `filter.window` inclusively when the source has a date field
/// - returns an empty vector (not an error) when nothing matches
/// - acquires its own connection and releases it before returning,
///   on success and on error
/// - returns `ErrorCode::SourceUnavailable` or `DatabaseError` when the
///   source cannot be read
#[async_trait]
pub trait PersonalDataReader: Send + Sync {
    /// Sentiment and emotion of the user's messages (windowed on `date`)
    async fn affects(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<AffectRecord>, DomainError>;

    /// Text and location of the user's messages (windowed on `date`)
    async fn behavior(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BehaviorRecord>, DomainError>;

    /// Inferred interests (windowed on `timestamp`)
    async fn interests(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<InterestRecord>, DomainError>;

    /// Heart-rate measurements (windowed on `timestamp`)
    async fn heart(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<HeartRecord>, DomainError>;

    /// Sleep measurements (windowed on `timestamp`)
    async fn sleep(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<SleepRecord>, DomainError>;

    /// Food log entries (windowed on `timestamp`)
    async fn food(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<FoodRecord>, DomainError>;

    /// Body composition measurements (windowed on `timestamp`)
    async fn body(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyRecord>, DomainError>;

    /// Social connections; the source has no date field, so no window
    async fn social_relations(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<ConnectionRecord>, DomainError>;
}
