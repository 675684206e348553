//! Audit log operations.
//!
//! Rows are append-only: handlers record authentication events as they
//! happen, and the dashboard reads them back newest-first with optional
//! filters. A failed insert must never break the request that triggered
//! it, so callers log and swallow errors from [`record`].

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::Result;
use crate::models::AuditLogEntry;

/// A new audit event to append.
#[derive(Debug, Clone)]
pub struct NewAuditEvent {
    /// Intercom admin id, if the session was verified.
    pub user_id: Option<String>,
    /// Admin display name, if known.
    pub user_name: Option<String>,
    /// Admin email, if known.
    pub user_email: Option<String>,
    /// Action label (e.g., "sign_in", "sign_out").
    pub action: String,
    /// Client IP the event came from.
    pub ip_address: String,
    /// Client User-Agent header.
    pub user_agent: String,
}

/// Optional predicates for audit log reads. `None` fields are skipped.
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    /// Match rows with exactly this action label.
    pub action: Option<String>,
    /// Match rows recorded for this user id.
    pub user_id: Option<String>,
}

/// Append `AND column = $n` for each present predicate.
///
/// Shared by [`query`] and [`count`] so the page and its total can never
/// disagree on which rows they describe.
fn push_filters<'args>(query: &mut QueryBuilder<'args, Postgres>, filter: &'args AuditLogFilter) {
    if let Some(action) = &filter.action {
        query.push(" AND action = ");
        query.push_bind(action);
    }

    if let Some(user_id) = &filter.user_id {
        query.push(" AND user_id = ");
        query.push_bind(user_id);
    }
}

/// Create the audit log table if it does not exist.
pub async fn ensure_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audit_logs (
            id SERIAL PRIMARY KEY,
            user_id VARCHAR(255),
            user_name VARCHAR(255),
            user_email VARCHAR(255),
            action VARCHAR(100) NOT NULL,
            ip_address VARCHAR(100),
            user_agent TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append one audit row, stamped with the database clock.
pub async fn record(pool: &PgPool, event: &NewAuditEvent) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (user_id, user_name, user_email, action, ip_address, user_agent, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(&event.user_id)
    .bind(&event.user_name)
    .bind(&event.user_email)
    .bind(&event.action)
    .bind(&event.ip_address)
    .bind(&event.user_agent)
    .execute(pool)
    .await?;

    Ok(())
}

/// Read a page of audit rows, newest first.
pub async fn query(
    pool: &PgPool,
    filter: &AuditLogFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditLogEntry>> {
    let mut query = QueryBuilder::<Postgres>::new(
        "SELECT id, user_id, user_name, user_email, action, ip_address, user_agent, created_at \
         FROM audit_logs WHERE 1=1",
    );
    push_filters(&mut query, filter);

    query.push(" ORDER BY created_at DESC");
    query.push(" LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind(offset);

    let entries = query
        .build_query_as::<AuditLogEntry>()
        .fetch_all(pool)
        .await?;

    Ok(entries)
}

/// Count every row matching the same filter, ignoring pagination.
pub async fn count(pool: &PgPool, filter: &AuditLogFilter) -> Result<i64> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_logs WHERE 1=1");
    push_filters(&mut query, filter);

    let total = query.build_query_scalar::<i64>().fetch_one(pool).await?;

    Ok(total)
}
