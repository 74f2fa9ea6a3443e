//! GetHolisticProfile - Query handler that aggregates the public profile view.
//!
//! For every category in the selector the sharing policy is consulted
//! first. Denied categories never reach their source. Allowed categories
//! are fetched concurrently, each into its own slot of the pre-shaped
//! result, and a failing source degrades only its own slot.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{DomainError, Username};
use crate::domain::holistic::{
    resolve, Access, AggregatedProfile, Category, CategorySelector, CategoryValue,
    CognitiveAspects, HolisticProfile, PhysicalState, QueryFilter, ResultLimit,
};
use crate::ports::{HolisticProfileRepository, PersonalDataReader};

/// Query for the aggregated view of one user's profile.
#[derive(Debug, Clone)]
pub struct GetHolisticProfileQuery {
    pub username: Username,
    pub selector: CategorySelector,
    pub filter: QueryFilter,
}

/// Handler for aggregating a holistic profile.
pub struct GetHolisticProfileHandler {
    profiles: Arc<dyn HolisticProfileRepository>,
    personal_data: Arc<dyn PersonalDataReader>,
}

impl GetHolisticProfileHandler {
    pub fn new(
        profiles: Arc<dyn HolisticProfileRepository>,
        personal_data: Arc<dyn PersonalDataReader>,
    ) -> Self {
        Self {
            profiles,
            personal_data,
        }
    }

    /// Returns `NotFound` if the user has no profile record; every other
    /// failure is folded into the affected category's slot.
    pub async fn handle(
        &self,
        query: GetHolisticProfileQuery,
    ) -> Result<AggregatedProfile, DomainError> {
        let profile = self
            .profiles
            .find_by_username(&query.username)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("Username not found.")
                    .with_detail("username", query.username.as_str())
            })?;

        let policy = *profile.policy();
        let allowed = |category: Category| {
            query.selector.includes(category) && resolve(category, &policy) == Access::Allowed
        };

        let user = profile.username();
        let filter = &query.filter;
        let reader = &self.personal_data;

        let (affects, behavior, interest, social_relations, physical_state) = futures::join!(
            fetch_slot(user, "affects", filter.limit, allowed(Category::Affects), || {
                reader.affects(user, filter)
            }),
            fetch_slot(user, "behavior", filter.limit, allowed(Category::Behavior), || {
                reader.behavior(user, filter)
            }),
            fetch_slot(user, "interest", filter.limit, allowed(Category::Interest), || {
                reader.interests(user, filter)
            }),
            fetch_slot(
                user,
                "socialRelations",
                filter.limit,
                allowed(Category::SocialRelations),
                || reader.social_relations(user, filter),
            ),
            self.physical_state(user, filter, allowed(Category::PhysicalState)),
        );

        let aggregated = AggregatedProfile {
            user: user.clone(),
            demographics: demographics_slot(&profile, allowed(Category::Demographics)),
            affects,
            behavior,
            cognitive_aspects: cognitive_slot(
                &profile,
                filter.limit,
                allowed(Category::CognitiveAspects),
            ),
            interest,
            physical_state,
            social_relations,
        };

        tracing::debug!(username = %user, selector = ?query.selector, "aggregated holistic profile");
        Ok(aggregated)
    }

    async fn physical_state(
        &self,
        user: &Username,
        filter: &QueryFilter,
        allowed: bool,
    ) -> PhysicalState {
        if !allowed {
            return PhysicalState::not_shared();
        }
        let reader = &self.personal_data;
        let (heart, sleep, food, body) = futures::join!(
            fetch_slot(user, "physicalState.heart", filter.limit, true, || {
                reader.heart(user, filter)
            }),
            fetch_slot(user, "physicalState.sleep", filter.limit, true, || {
                reader.sleep(user, filter)
            }),
            fetch_slot(user, "physicalState.food", filter.limit, true, || {
                reader.food(user, filter)
            }),
            fetch_slot(user, "physicalState.body", filter.limit, true, || {
                reader.body(user, filter)
            }),
        );
        PhysicalState {
            heart,
            sleep,
            food,
            body,
        }
    }
}

/// Runs one fetcher if allowed and resolves its slot.
///
/// The limit is re-applied to whatever the source returned so the cap holds
/// regardless of adapter behavior.
async fn fetch_slot<T, F, Fut>(
    user: &Username,
    slot: &'static str,
    limit: ResultLimit,
    allowed: bool,
    fetch: F,
) -> CategoryValue<Vec<T>>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>, DomainError>>,
{
    if !allowed {
        return CategoryValue::NotShared;
    }
    let result = fetch().await.map(|records| limit.truncate(records));
    if let Err(error) = &result {
        tracing::warn!(username = %user, slot, %error, "category source unavailable");
    }
    CategoryValue::from_fetch(result)
}

fn demographics_slot(
    profile: &HolisticProfile,
    allowed: bool,
) -> CategoryValue<serde_json::Map<String, Value>> {
    if !allowed {
        return CategoryValue::NotShared;
    }
    match profile.demographics() {
        Some(demographics) if !demographics.is_empty() => {
            CategoryValue::Shared(demographics.clone())
        }
        _ => CategoryValue::MissingInformation,
    }
}

fn cognitive_slot(profile: &HolisticProfile, limit: ResultLimit, allowed: bool) -> CognitiveAspects {
    if !allowed {
        return CognitiveAspects::uniform(CategoryValue::NotShared);
    }
    CognitiveAspects {
        personalities: CategoryValue::from_records(limit.truncate(profile.personalities().to_vec())),
        empathies: CategoryValue::from_records(limit.truncate(profile.empathies().to_vec())),
    }
}
