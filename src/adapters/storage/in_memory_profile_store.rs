//! In-Memory Profile Store Adapter
//!
//! Holds profile records and per-user personal data in memory.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, Username};
use crate::domain::holistic::records::{
    AffectRecord, BehaviorRecord, BodyRecord, ConnectionRecord, FoodRecord, HeartRecord,
    InterestRecord, SleepRecord,
};
use crate::domain::holistic::{HolisticProfile, PhysicalKind, QueryFilter};
use crate::ports::{HolisticProfileRepository, PersonalDataReader};

/// A stored message; affects and behavior are two projections of it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMessage {
    pub date: Timestamp,
    pub text: Option<String>,
    pub sentiment: Option<f64>,
    pub emotion: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StoredMessage {
    pub fn new(date: Timestamp, text: impl Into<String>) -> Self {
        Self {
            date,
            text: Some(text.into()),
            sentiment: None,
            emotion: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_affect(mut self, sentiment: f64, emotion: impl Into<String>) -> Self {
        self.sentiment = Some(sentiment);
        self.emotion = Some(emotion.into());
        self
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Everything stored for one user outside the profile record, in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct UserData {
    pub messages: Vec<StoredMessage>,
    pub interests: Vec<InterestRecord>,
    pub heart: Vec<HeartRecord>,
    pub sleep: Vec<SleepRecord>,
    pub food: Vec<FoodRecord>,
    pub body: Vec<BodyRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// Sources that can be taken offline to simulate outages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSource {
    Messages,
    Interests,
    Physical(PhysicalKind),
    Connections,
}

/// In-memory implementation of both data ports.
#[derive(Debug, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<BTreeMap<Username, HolisticProfile>>>,
    data: Arc<RwLock<HashMap<Username, UserData>>>,
    offline: Arc<RwLock<HashSet<DataSource>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(RwLock::new(BTreeMap::new())),
            data: Arc::new(RwLock::new(HashMap::new())),
            offline: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Insert or replace a profile record
    pub async fn insert_profile(&self, profile: HolisticProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.username().clone(), profile);
    }

    /// Replace everything stored for a user
    pub async fn insert_data(&self, username: Username, data: UserData) {
        self.data.write().await.insert(username, data);
    }

    /// Simulate an outage of one source
    pub async fn take_offline(&self, source: DataSource) {
        self.offline.write().await.insert(source);
    }

    pub async fn bring_online(&self, source: DataSource) {
        self.offline.write().await.remove(&source);
    }

    /// Get the number of stored profiles
    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.len()
    }

    async fn read<T>(
        &self,
        source: DataSource,
        username: &Username,
        project: impl FnOnce(&UserData) -> Vec<T>,
    ) -> Result<Vec<T>, DomainError> {
        if self.offline.read().await.contains(&source) {
            return Err(DomainError::new(
                ErrorCode::SourceUnavailable,
                format!("{:?} source is offline", source),
            ));
        }
        Ok(self
            .data
            .read()
            .await
            .get(username)
            .map(project)
            .unwrap_or_default())
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the window on the record's date and then the limit, keeping
/// insertion order.
fn select<T, R>(
    records: &[T],
    filter: &QueryFilter,
    at: impl Fn(&T) -> Timestamp,
    project: impl Fn(&T) -> R,
) -> Vec<R> {
    let matching = records
        .iter()
        .filter(|r| filter.window.contains(&at(r)))
        .map(project);
    match filter.limit.cap() {
        Some(n) => matching.take(n).collect(),
        None => matching.collect(),
    }
}

#[async_trait]
impl HolisticProfileRepository for InMemoryProfileStore {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<HolisticProfile>, DomainError> {
        Ok(self.profiles.read().await.get(username).cloned())
    }

    async fn search_usernames(&self, fragment: &str) -> Result<Vec<Username>, DomainError> {
        let needle = fragment.to_lowercase();
        Ok(self
            .profiles
            .read()
            .await
            .keys()
            .filter(|u| u.as_str().to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn save_policy(&self, profile: &HolisticProfile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(profile.username()) {
            Some(stored) => {
                *stored = profile.clone();
                Ok(())
            }
            None => Err(DomainError::not_found("Username not found.")),
        }
    }
}

#[async_trait]
impl PersonalDataReader for InMemoryProfileStore {
    async fn affects(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<AffectRecord>, DomainError> {
        self.read(DataSource::Messages, username, |d| {
            select(&d.messages, filter, |m| m.date, |m| AffectRecord {
                date: m.date,
                sentiment: m.sentiment,
                emotion: m.emotion.clone(),
            })
        })
        .await
    }

    async fn behavior(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BehaviorRecord>, DomainError> {
        self.read(DataSource::Messages, username, |d| {
            select(&d.messages, filter, |m| m.date, |m| BehaviorRecord {
                text: m.text.clone(),
                latitude: m.latitude,
                longitude: m.longitude,
                date: m.date,
            })
        })
        .await
    }

    async fn interests(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<InterestRecord>, DomainError> {
        self.read(DataSource::Interests, username, |d| {
            select(&d.interests, filter, |r| r.timestamp, Clone::clone)
        })
        .await
    }

    async fn heart(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<HeartRecord>, DomainError> {
        self.read(DataSource::Physical(PhysicalKind::Heart), username, |d| {
            select(&d.heart, filter, |r| r.timestamp, Clone::clone)
        })
        .await
    }

    async fn sleep(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<SleepRecord>, DomainError> {
        self.read(DataSource::Physical(PhysicalKind::Sleep), username, |d| {
            select(&d.sleep, filter, |r| r.timestamp, Clone::clone)
        })
        .await
    }

    async fn food(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<FoodRecord>, DomainError> {
        self.read(DataSource::Physical(PhysicalKind::Food), username, |d| {
            select(&d.food, filter, |r| r.timestamp, Clone::clone)
        })
        .await
    }

    async fn body(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyRecord>, DomainError> {
        self.read(DataSource::Physical(PhysicalKind::Body), username, |d| {
            select(&d.body, filter, |r| r.timestamp, Clone::clone)
        })
        .await
    }

    async fn social_relations(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<ConnectionRecord>, DomainError> {
        self.read(DataSource::Connections, username, |d| {
            filter.limit.truncate(d.connections.clone())
        })
        .await
    }
}
