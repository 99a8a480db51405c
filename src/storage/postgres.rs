//! Feedback store backed by a PostgreSQL table.

use crate::domain::feedback::{FeedbackRecord, NewFeedback, Rating};
use crate::storage::store::{FeedbackStore, StoreError};
use crate::storage::is_plain_identifier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => StoreError::rejected(db.to_string()),
            other => StoreError::unavailable(other.to_string()),
        }
    }
}

/// A feedback store that uses a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PostgresFeedbackStore {
    pool: PgPool,
}

impl PostgresFeedbackStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `database_url` with a pool of at most `max_connections`.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates `table` if it does not exist yet.
    pub async fn ensure_table(&self, table: &str) -> Result<(), StoreError> {
        let table = checked_table(table)?;
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id BIGSERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                location TEXT NULL,
                message TEXT NOT NULL,
                rating SMALLINT NOT NULL CHECK (rating BETWEEN 1 AND 5),
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )"
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        tracing::debug!(table, "feedback table ready");
        Ok(())
    }
}

fn checked_table(table: &str) -> Result<&str, StoreError> {
    if is_plain_identifier(table) {
        Ok(table)
    } else {
        Err(StoreError::InvalidTable(table.to_string()))
    }
}

#[async_trait]
impl FeedbackStore for PostgresFeedbackStore {
    async fn list(&self, table: &str) -> Result<Vec<FeedbackRecord>, StoreError> {
        let table = checked_table(table)?;
        let sql = format!(
            "SELECT id, name, location, message, rating, created_at FROM {table}
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.try_get("id")?;
            let stars: i16 = row.try_get("rating")?;
            // Rows written outside the validator may violate the rating bounds.
            let Ok(rating) = Rating::try_from(i64::from(stars)) else {
                tracing::warn!(table, id, rating = stars, "skipping feedback row with out-of-range rating");
                continue;
            };
            let created_at: DateTime<Utc> = row.try_get("created_at")?;
            records.push(FeedbackRecord {
                id,
                name: row.try_get("name")?,
                location: row.try_get("location")?,
                message: row.try_get("message")?,
                rating,
                created_at,
            });
        }
        Ok(records)
    }

    async fn create(&self, table: &str, input: &NewFeedback) -> Result<(), StoreError> {
        let table = checked_table(table)?;
        let sql = format!(
            "INSERT INTO {table} (name, location, message, rating) VALUES ($1, $2, $3, $4)"
        );
        sqlx::query(&sql)
            .bind(&input.name)
            .bind(input.location.as_deref())
            .bind(&input.message)
            .bind(i16::from(input.rating.get()))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
