//! Daily team snapshot storage.
//!
//! One JSON document per day, keyed by `YYYY-MM-DD`. Saving the same day
//! again overwrites the previous document.

use chrono::NaiveDateTime;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::Result;

/// Create the snapshot table if it does not exist.
pub async fn ensure_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tse_snapshots (
            id SERIAL PRIMARY KEY,
            date VARCHAR(10) NOT NULL,
            timestamp TIMESTAMP NOT NULL,
            tse_data JSONB NOT NULL,
            created_at TIMESTAMP DEFAULT NOW(),
            UNIQUE(date)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert or overwrite the snapshot for one day.
///
/// A missing timestamp is handed to Postgres as NULL and rejected by the
/// NOT NULL constraint, surfacing as a storage error.
pub async fn upsert(
    pool: &PgPool,
    date: &str,
    timestamp: Option<NaiveDateTime>,
    tse_data: &Value,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tse_snapshots (date, timestamp, tse_data)
        VALUES ($1, $2, $3)
        ON CONFLICT (date)
        DO UPDATE SET
            timestamp = EXCLUDED.timestamp,
            tse_data = EXCLUDED.tse_data,
            created_at = NOW()
        "#,
    )
    .bind(date)
    .bind(timestamp)
    .bind(tse_data)
    .execute(pool)
    .await?;

    Ok(())
}
