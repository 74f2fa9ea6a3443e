//! The stored profile record and the aggregated view built from it.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::foundation::{DomainError, Timestamp, Username};

use super::records::{
    AffectRecord, BehaviorRecord, BodyRecord, ConnectionRecord, FoodRecord, HeartRecord,
    InterestRecord, SleepRecord,
};
use super::{PolicyUpdate, SharingPolicy};

/// Sentinel served when the owner has not shared a category.
pub const NOT_SHARED: &str = "Information not shared by the user";
/// Sentinel served when a category is shared but has no records.
pub const MISSING_INFORMATION: &str = "Missing information";
/// Sentinel served when a shared category's source could not be read.
pub const UNAVAILABLE: &str = "Information temporarily unavailable";

/// Profile version, bumped on every policy write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PolicyVersion(u32);

impl PolicyVersion {
    pub fn initial() -> Self {
        Self(1)
    }

    pub fn from_u32(value: u32) -> Result<Self, &'static str> {
        if value == 0 {
            Err("Policy version must be greater than 0")
        } else {
            Ok(Self(value))
        }
    }

    pub fn increment(&self) -> Self {
        Self(self.0.saturating_add(1))
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl Default for PolicyVersion {
    fn default() -> Self {
        Self::initial()
    }
}

/// A user's profile record: identity, profile-embedded data and the
/// sharing policy that gates everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct HolisticProfile {
    username: Username,
    demographics: Option<Map<String, Value>>,
    personalities: Vec<Value>,
    empathies: Vec<Value>,
    policy: SharingPolicy,
    version: PolicyVersion,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl HolisticProfile {
    /// Creates an empty profile with a private policy.
    pub fn new(username: Username) -> Self {
        let now = Timestamp::now();
        Self {
            username,
            demographics: None,
            personalities: Vec::new(),
            empathies: Vec::new(),
            policy: SharingPolicy::private(),
            version: PolicyVersion::initial(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a profile from persisted state.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        username: Username,
        demographics: Option<Map<String, Value>>,
        personalities: Vec<Value>,
        empathies: Vec<Value>,
        policy: SharingPolicy,
        version: PolicyVersion,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            username,
            demographics,
            personalities,
            empathies,
            policy,
            version,
            created_at,
            updated_at,
        }
    }

    pub fn with_demographics(mut self, demographics: Map<String, Value>) -> Self {
        self.demographics = Some(demographics);
        self
    }

    pub fn with_personalities(mut self, personalities: Vec<Value>) -> Self {
        self.personalities = personalities;
        self
    }

    pub fn with_empathies(mut self, empathies: Vec<Value>) -> Self {
        self.empathies = empathies;
        self
    }

    pub fn with_policy(mut self, policy: SharingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies a partial policy update and bumps the version.
    pub fn update_policy(&mut self, update: &PolicyUpdate) {
        self.policy = self.policy.apply(update);
        self.version = self.version.increment();
        self.updated_at = Timestamp::now();
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn demographics(&self) -> Option<&Map<String, Value>> {
        self.demographics.as_ref()
    }

    pub fn personalities(&self) -> &[Value] {
        &self.personalities
    }

    pub fn empathies(&self) -> &[Value] {
        &self.empathies
    }

    pub fn policy(&self) -> &SharingPolicy {
        &self.policy
    }

    pub fn version(&self) -> PolicyVersion {
        self.version
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }
}

/// Resolved value of one category slot.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryValue<T> {
    Shared(T),
    MissingInformation,
    NotShared,
    Unavailable,
}

impl<T> CategoryValue<T> {
    pub fn is_shared(&self) -> bool {
        matches!(self, CategoryValue::Shared(_))
    }

    pub fn shared(&self) -> Option<&T> {
        match self {
            CategoryValue::Shared(value) => Some(value),
            _ => None,
        }
    }

    /// Sentinel text, or `None` for shared data.
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            CategoryValue::Shared(_) => None,
            CategoryValue::MissingInformation => Some(MISSING_INFORMATION),
            CategoryValue::NotShared => Some(NOT_SHARED),
            CategoryValue::Unavailable => Some(UNAVAILABLE),
        }
    }
}

impl<T> CategoryValue<Vec<T>> {
    /// Zero records resolve to missing information.
    pub fn from_records(records: Vec<T>) -> Self {
        if records.is_empty() {
            CategoryValue::MissingInformation
        } else {
            CategoryValue::Shared(records)
        }
    }

    /// Like `from_records`, with fetch failures degraded to `Unavailable`.
    pub fn from_fetch(result: Result<Vec<T>, DomainError>) -> Self {
        match result {
            Ok(records) => Self::from_records(records),
            Err(_) => CategoryValue::Unavailable,
        }
    }
}

impl<T: Serialize> Serialize for CategoryValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CategoryValue::Shared(value) => value.serialize(serializer),
            other => serializer.serialize_str(other.sentinel().unwrap_or(NOT_SHARED)),
        }
    }
}

/// Personality and empathy assessments, resolved independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CognitiveAspects {
    pub personalities: CategoryValue<Vec<Value>>,
    pub empathies: CategoryValue<Vec<Value>>,
}

impl CognitiveAspects {
    pub fn uniform(value: CategoryValue<Vec<Value>>) -> Self {
        Self {
            personalities: value.clone(),
            empathies: value,
        }
    }
}

/// Physical-state measurements, one slot per measurement source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalState {
    pub heart: CategoryValue<Vec<HeartRecord>>,
    pub sleep: CategoryValue<Vec<SleepRecord>>,
    pub food: CategoryValue<Vec<FoodRecord>>,
    pub body: CategoryValue<Vec<BodyRecord>>,
}

impl PhysicalState {
    pub fn not_shared() -> Self {
        Self {
            heart: CategoryValue::NotShared,
            sleep: CategoryValue::NotShared,
            food: CategoryValue::NotShared,
            body: CategoryValue::NotShared,
        }
    }
}

/// The public view of a profile: every category key is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedProfile {
    pub user: Username,
    pub demographics: CategoryValue<Map<String, Value>>,
    pub affects: CategoryValue<Vec<AffectRecord>>,
    pub behavior: CategoryValue<Vec<BehaviorRecord>>,
    pub cognitive_aspects: CognitiveAspects,
    pub interest: CategoryValue<Vec<InterestRecord>>,
    pub physical_state: PhysicalState,
    pub social_relations: CategoryValue<Vec<ConnectionRecord>>,
}

impl AggregatedProfile {
    /// Pre-shaped result with every slot set to not-shared.
    pub fn not_shared(user: Username) -> Self {
        Self {
            user,
            demographics: CategoryValue::NotShared,
            affects: CategoryValue::NotShared,
            behavior: CategoryValue::NotShared,
            cognitive_aspects: CognitiveAspects::uniform(CategoryValue::NotShared),
            interest: CategoryValue::NotShared,
            physical_state: PhysicalState::not_shared(),
            social_relations: CategoryValue::NotShared,
        }
    }
}
