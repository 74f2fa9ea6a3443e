//! PostgreSQL adapter for PersonalDataReader
//!
//! Every fetcher checks out its own pooled connection for the duration of
//! one query. The connection goes back to the pool when it is dropped,
//! whichever way the fetcher returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::pool::PoolConnection;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row};

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, Username};
use crate::domain::holistic::records::{
    AffectRecord, BehaviorRecord, BodyRecord, ConnectionRecord, FoodRecord, HeartRecord,
    InterestRecord, SleepRecord,
};
use crate::domain::holistic::{PhysicalKind, QueryFilter};
use crate::ports::PersonalDataReader;

/// PostgreSQL implementation of PersonalDataReader
pub struct PostgresPersonalDataReader {
    pool: PgPool,
}

/// Bind values shared by every windowed query: lower bound, upper bound
/// and limit. `NULL` disables the corresponding clause.
struct Binds {
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    limit: Option<i64>,
}

impl Binds {
    fn of(filter: &QueryFilter) -> Self {
        Self {
            from: filter.window.from().map(|t| *t.as_datetime()),
            to: filter.window.to().map(|t| *t.as_datetime()),
            limit: filter
                .limit
                .cap()
                .map(|n| i64::try_from(n).unwrap_or(i64::MAX)),
        }
    }
}

impl PostgresPersonalDataReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn connection(&self, source: &str) -> Result<PoolConnection<Postgres>, DomainError> {
        self.pool.acquire().await.map_err(|e| {
            DomainError::new(
                ErrorCode::SourceUnavailable,
                format!("Could not reach {} source: {}", source, e),
            )
        })
    }

    async fn messages(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<PgRow>, DomainError> {
        let binds = Binds::of(filter);
        let mut conn = self.connection("messages").await?;
        let rows = sqlx::query(
            r#"
            SELECT date, text, sentiment, emotion, latitude, longitude
            FROM messages
            WHERE username = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(username.as_str())
        .bind(binds.from)
        .bind(binds.to)
        .bind(binds.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(DomainError::database)?;
        Ok(rows)
    }

    /// Reads one kind of measurement. Each row's JSONB `measurements`
    /// object is merged with its `timestamp` column into the record.
    async fn measurements<T: DeserializeOwned>(
        &self,
        username: &Username,
        filter: &QueryFilter,
        kind: PhysicalKind,
    ) -> Result<Vec<T>, DomainError> {
        let binds = Binds::of(filter);
        let mut conn = self.connection(kind.source_tag()).await?;
        let rows = sqlx::query(
            r#"
            SELECT timestamp, measurements
            FROM personal_data
            WHERE username = $1
              AND source = $2
              AND ($3::timestamptz IS NULL OR timestamp >= $3)
              AND ($4::timestamptz IS NULL OR timestamp <= $4)
            ORDER BY id
            LIMIT $5
            "#,
        )
        .bind(username.as_str())
        .bind(kind.source_tag())
        .bind(binds.from)
        .bind(binds.to)
        .bind(binds.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(DomainError::database)?;

        rows.iter()
            .map(|row| -> Result<T, DomainError> {
                let timestamp: DateTime<Utc> =
                    row.try_get("timestamp").map_err(DomainError::database)?;
                let measurements: Value =
                    row.try_get("measurements").map_err(DomainError::database)?;

                let mut record = match measurements {
                    Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };
                record.insert(
                    "timestamp".to_string(),
                    Value::String(timestamp.to_rfc3339()),
                );
                serde_json::from_value(Value::Object(record)).map_err(|e| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        format!("Malformed {} record: {}", kind.source_tag(), e),
                    )
                })
            })
            .collect()
    }
}

fn timestamp_of(row: &PgRow, column: &str) -> Result<Timestamp, DomainError> {
    row.try_get::<DateTime<Utc>, _>(column)
        .map(Timestamp::from_datetime)
        .map_err(DomainError::database)
}

#[async_trait]
impl PersonalDataReader for PostgresPersonalDataReader {
    async fn affects(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<AffectRecord>, DomainError> {
        self.messages(username, filter)
            .await?
            .iter()
            .map(|row| -> Result<AffectRecord, DomainError> {
                Ok(AffectRecord {
                    date: timestamp_of(row, "date")?,
                    sentiment: row.try_get("sentiment").map_err(DomainError::database)?,
                    emotion: row.try_get("emotion").map_err(DomainError::database)?,
                })
            })
            .collect()
    }

    async fn behavior(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BehaviorRecord>, DomainError> {
        self.messages(username, filter)
            .await?
            .iter()
            .map(|row| -> Result<BehaviorRecord, DomainError> {
                Ok(BehaviorRecord {
                    text: row.try_get("text").map_err(DomainError::database)?,
                    latitude: row.try_get("latitude").map_err(DomainError::database)?,
                    longitude: row.try_get("longitude").map_err(DomainError::database)?,
                    date: timestamp_of(row, "date")?,
                })
            })
            .collect()
    }

    async fn interests(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<InterestRecord>, DomainError> {
        let binds = Binds::of(filter);
        let mut conn = self.connection("interests").await?;
        let rows = sqlx::query(
            r#"
            SELECT value, confidence, timestamp
            FROM interests
            WHERE username = $1
              AND ($2::timestamptz IS NULL OR timestamp >= $2)
              AND ($3::timestamptz IS NULL OR timestamp <= $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(username.as_str())
        .bind(binds.from)
        .bind(binds.to)
        .bind(binds.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(DomainError::database)?;

        rows.iter()
            .map(|row| -> Result<InterestRecord, DomainError> {
                Ok(InterestRecord {
                    value: row.try_get("value").map_err(DomainError::database)?,
                    confidence: row.try_get("confidence").map_err(DomainError::database)?,
                    timestamp: timestamp_of(row, "timestamp")?,
                })
            })
            .collect()
    }

    async fn heart(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<HeartRecord>, DomainError> {
        self.measurements(username, filter, PhysicalKind::Heart).await
    }

    async fn sleep(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<SleepRecord>, DomainError> {
        self.measurements(username, filter, PhysicalKind::Sleep).await
    }

    async fn food(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<FoodRecord>, DomainError> {
        self.measurements(username, filter, PhysicalKind::Food).await
    }

    async fn body(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<BodyRecord>, DomainError> {
        self.measurements(username, filter, PhysicalKind::Body).await
    }

    async fn social_relations(
        &self,
        username: &Username,
        filter: &QueryFilter,
    ) -> Result<Vec<ConnectionRecord>, DomainError> {
        let limit = Binds::of(filter).limit;
        let mut conn = self.connection("connections").await?;
        let rows = sqlx::query(
            r#"
            SELECT contact_id, source
            FROM connections
            WHERE username = $1
            ORDER BY id
            LIMIT $2
            "#,
        )
        .bind(username.as_str())
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(DomainError::database)?;

        rows.iter()
            .map(|row| -> Result<ConnectionRecord, DomainError> {
                Ok(ConnectionRecord {
                    contact_id: row.try_get("contact_id").map_err(DomainError::database)?,
                    source: row.try_get("source").map_err(DomainError::database)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::holistic::{ResultLimit, TemporalWindow};
    use chrono::TimeZone;

    #[test]
    fn unbounded_filter_binds_nulls() {
        let binds = Binds::of(&QueryFilter::unbounded());

        assert!(binds.from.is_none());
        assert!(binds.to.is_none());
        assert!(binds.limit.is_none());
    }

    #[test]
    fn bounded_filter_binds_window_and_limit() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let window = TemporalWindow::new(Some(Timestamp::from_datetime(from)), None).unwrap();
        let filter = QueryFilter::unbounded()
            .with_limit(ResultLimit::at_most(5))
            .with_window(window);

        let binds = Binds::of(&filter);

        assert_eq!(binds.from, Some(from));
        assert!(binds.to.is_none());
        assert_eq!(binds.limit, Some(5));
    }
}
