//! PostgreSQL adapter for HolisticProfileRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, Username};
use crate::domain::holistic::{HolisticProfile, PolicyVersion, SharingPolicy};
use crate::ports::HolisticProfileRepository;

/// Upper bound on search results.
const SEARCH_LIMIT: i64 = 50;

/// PostgreSQL implementation of HolisticProfileRepository
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn corrupt(username: &str, what: &str) -> DomainError {
    DomainError::new(
        ErrorCode::InternalError,
        format!("Stored {} for '{}' is malformed", what, username),
    )
}

fn profile_from_row(row: &PgRow) -> Result<HolisticProfile, DomainError> {
    let raw_username: String = row.try_get("username").map_err(DomainError::database)?;
    let demographics: Option<Value> = row.try_get("demographics").map_err(DomainError::database)?;
    let personalities: Value = row.try_get("personalities").map_err(DomainError::database)?;
    let empathies: Value = row.try_get("empathies").map_err(DomainError::database)?;
    let policy: Json<SharingPolicy> =
        row.try_get("sharing_policy").map_err(DomainError::database)?;
    let version: i32 = row.try_get("policy_version").map_err(DomainError::database)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(DomainError::database)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(DomainError::database)?;

    let username = Username::new(&raw_username)?;
    let version = u32::try_from(version)
        .ok()
        .and_then(|v| PolicyVersion::from_u32(v).ok())
        .ok_or_else(|| corrupt(&raw_username, "policy version"))?;

    let into_list = |value: Value| match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    };

    Ok(HolisticProfile::reconstitute(
        username,
        demographics.and_then(|d| d.as_object().cloned()),
        into_list(personalities),
        into_list(empathies),
        policy.0,
        version,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

/// Escapes LIKE wildcards so the fragment matches literally.
fn like_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl HolisticProfileRepository for PostgresProfileRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<HolisticProfile>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT
                username,
                demographics,
                personalities,
                empathies,
                sharing_policy,
                policy_version,
                created_at,
                updated_at
            FROM holistic_profiles
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DomainError::database)?;

        row.as_ref().map(profile_from_row).transpose()
    }

    async fn search_usernames(&self, fragment: &str) -> Result<Vec<Username>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT username
            FROM holistic_profiles
            WHERE username ILIKE $1
            ORDER BY username
            LIMIT $2
            "#,
        )
        .bind(like_pattern(fragment))
        .bind(SEARCH_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::database)?;

        Ok(rows
            .iter()
            .filter_map(|row| row.try_get::<String, _>("username").ok())
            .filter_map(|name| Username::new(name).ok())
            .collect())
    }

    async fn save_policy(&self, profile: &HolisticProfile) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE holistic_profiles
            SET sharing_policy = $2,
                policy_version = $3,
                updated_at = $4
            WHERE username = $1
            "#,
        )
        .bind(profile.username().as_str())
        .bind(Json(profile.policy()))
        .bind(i32::try_from(profile.version().as_u32()).unwrap_or(i32::MAX))
        .bind(*profile.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(DomainError::database)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Username not found."));
        }
        Ok(())
    }
}
