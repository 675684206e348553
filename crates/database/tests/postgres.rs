//! Integration tests against a live Postgres database.
//!
//! Ignored by default. Set `TEST_POSTGRES_URL` and run
//! `cargo test -p database -- --ignored` to exercise them. Each test
//! truncates the tables it touches, so point this at a scratch database.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use database::{
    audit_log, response_time, snapshot, AuditLogFilter, Database, MetricRange, NewAuditEvent,
    NewResponseTimeMetric,
};
use serde_json::json;

async fn test_db() -> Database {
    let url = std::env::var("TEST_POSTGRES_URL")
        .expect("set TEST_POSTGRES_URL to run Postgres integration tests");
    let db = Database::connect(&url).unwrap();
    db.ensure_schema().await.unwrap();
    db
}

fn event(action: &str, user_id: Option<&str>) -> NewAuditEvent {
    NewAuditEvent {
        user_id: user_id.map(str::to_string),
        user_name: Some("Test Admin".to_string()),
        user_email: Some("admin@example.com".to_string()),
        action: action.to_string(),
        ip_address: "203.0.113.9".to_string(),
        user_agent: "integration-tests".to_string(),
    }
}

fn noon(date: &str) -> NaiveDateTime {
    let day: NaiveDate = date.parse().unwrap();
    day.and_hms_opt(12, 0, 0).unwrap()
}

fn metric(date: &str, count_10_plus_min: i32) -> NewResponseTimeMetric {
    NewResponseTimeMetric {
        timestamp: noon(date),
        date: date.to_string(),
        count_5_plus_min: count_10_plus_min + 2,
        count_5_to_10_min: 2,
        count_10_plus_min,
        total_conversations: 40,
        percentage_5_plus_min: 12.5,
        percentage_5_to_10_min: 5.0,
        percentage_10_plus_min: 7.5,
        conversation_ids_5_plus_min: Some(json!(["101", "102"])),
        conversation_ids_10_plus_min: Some(json!(["101"])),
    }
}

#[tokio::test]
#[ignore]
async fn test_audit_record_query_count() {
    let db = test_db().await;
    sqlx::query("TRUNCATE audit_logs")
        .execute(db.pool())
        .await
        .unwrap();

    audit_log::record(db.pool(), &event("sign_in", Some("1")))
        .await
        .unwrap();
    audit_log::record(db.pool(), &event("sign_out", Some("1")))
        .await
        .unwrap();
    audit_log::record(db.pool(), &event("sign_in", Some("2")))
        .await
        .unwrap();

    let all = audit_log::query(db.pool(), &AuditLogFilter::default(), 100, 0)
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let filter = AuditLogFilter {
        action: Some("sign_in".to_string()),
        ..Default::default()
    };
    let sign_ins = audit_log::query(db.pool(), &filter, 100, 0).await.unwrap();
    assert_eq!(sign_ins.len(), 2);
    assert!(sign_ins.iter().all(|row| row.action == "sign_in"));
    assert_eq!(audit_log::count(db.pool(), &filter).await.unwrap(), 2);

    let both = AuditLogFilter {
        action: Some("sign_in".to_string()),
        user_id: Some("2".to_string()),
    };
    assert_eq!(audit_log::count(db.pool(), &both).await.unwrap(), 1);

    // Page past the end.
    let paged = audit_log::query(db.pool(), &AuditLogFilter::default(), 2, 2)
        .await
        .unwrap();
    assert_eq!(paged.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_snapshot_upsert_overwrites_same_day() {
    let db = test_db().await;
    sqlx::query("TRUNCATE tse_snapshots")
        .execute(db.pool())
        .await
        .unwrap();

    snapshot::upsert(
        db.pool(),
        "2024-06-01",
        Some(noon("2024-06-01")),
        &json!({"open": 4}),
    )
    .await
    .unwrap();
    snapshot::upsert(
        db.pool(),
        "2024-06-01",
        Some(noon("2024-06-01") + Duration::hours(5)),
        &json!({"open": 9}),
    )
    .await
    .unwrap();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tse_snapshots")
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(total, 1);

    let data: serde_json::Value =
        sqlx::query_scalar("SELECT tse_data FROM tse_snapshots WHERE date = $1")
            .bind("2024-06-01")
            .fetch_one(db.pool())
            .await
            .unwrap();
    assert_eq!(data, json!({"open": 9}));
}

#[tokio::test]
#[ignore]
async fn test_snapshot_rejects_missing_timestamp() {
    let db = test_db().await;

    let result = snapshot::upsert(db.pool(), "2024-06-02", None, &json!({"open": 1})).await;
    assert!(result.is_err());
}

#[tokio::test]
#[ignore]
async fn test_metric_upsert_and_ranges() {
    let db = test_db().await;
    sqlx::query("TRUNCATE response_time_metrics")
        .execute(db.pool())
        .await
        .unwrap();

    response_time::upsert(db.pool(), &metric("2024-06-01", 3))
        .await
        .unwrap();
    response_time::upsert(db.pool(), &metric("2024-06-02", 5))
        .await
        .unwrap();
    // Same day again overwrites instead of inserting.
    response_time::upsert(db.pool(), &metric("2024-06-02", 6))
        .await
        .unwrap();

    let all = response_time::query(db.pool(), &MetricRange::All).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].date, "2024-06-02");
    assert_eq!(all[0].count_10_plus_min, 6);
    assert!((all[0].percentage_10_plus_min - 7.5).abs() < f64::EPSILON);
    assert_eq!(all[0].conversation_ids_10_plus_min, Some(json!(["101"])));

    let window = response_time::query(
        db.pool(),
        &MetricRange::Between("2024-06-01".to_string(), "2024-06-01".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].date, "2024-06-01");

    let from = response_time::query(db.pool(), &MetricRange::From("2024-06-02".to_string()))
        .await
        .unwrap();
    assert_eq!(from.len(), 1);
    assert_eq!(from[0].count_10_plus_min, 6);

    let until = response_time::query(db.pool(), &MetricRange::Until("2024-06-01".to_string()))
        .await
        .unwrap();
    assert_eq!(until.len(), 1);
    assert_eq!(until[0].date, "2024-06-01");
}
