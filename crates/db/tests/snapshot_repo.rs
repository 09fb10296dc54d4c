//! Integration tests for the `records` and `record_snapshots` repositories.
//!
//! Exercises the Postgres repositories against a real database:
//! - Version-checked head updates reject stale versions
//! - Snapshot upserts overwrite on `(record_id, version)` collisions
//! - Restoration sources are never overwritten
//! - History and range listings are ordered and payload-free
//! - Soft deletion hides the record but keeps its snapshots
//!
//! Requires `DATABASE_URL`; run with `cargo test -p formhist-db -- --ignored`.

use assert_matches::assert_matches;
use formhist_db::models::record::CreateRecord;
use formhist_db::models::snapshot::NewSnapshot;
use formhist_db::repositories::{RecordRepo, SnapshotRepo};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_record(q1: i64) -> CreateRecord {
    CreateRecord {
        payload: json!({ "intake": { "q1": q1 } }),
        created_by: "repo-test".to_string(),
    }
}

fn new_snapshot(record_id: i64, version: i32, q1: i64) -> NewSnapshot {
    NewSnapshot {
        record_id,
        version,
        payload: json!({ "intake": { "q1": q1 } }),
        changed_by: "repo-test".to_string(),
        change_notes: format!("v{version}"),
        is_restoration: false,
        restored_from_version: None,
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_create_starts_at_version_one(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();
    assert_eq!(record.current_version, 1);
    assert_eq!(record.payload, json!({ "intake": { "q1": 0 } }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_advance_version_is_conditional(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();

    let stale = RecordRepo::advance_version(&pool, record.id, 5, &json!({ "q1": 1 }))
        .await
        .unwrap();
    assert!(stale.is_none(), "stale expected version must not update");

    let advanced = RecordRepo::advance_version(&pool, record.id, 1, &json!({ "q1": 1 }))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(advanced.current_version, 2);

    let replay = RecordRepo::advance_version(&pool, record.id, 1, &json!({ "q1": 9 }))
        .await
        .unwrap();
    assert!(replay.is_none(), "second writer with the same base loses");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_soft_delete_keeps_snapshots(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();
    SnapshotRepo::upsert(&pool, &new_snapshot(record.id, 1, 0))
        .await
        .unwrap();

    assert!(RecordRepo::soft_delete(&pool, record.id).await.unwrap());
    assert!(RecordRepo::find_by_id(&pool, record.id).await.unwrap().is_none());

    let history = SnapshotRepo::list_by_record(&pool, record.id).await.unwrap();
    assert_eq!(history.len(), 1);
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_upsert_overwrites_existing_version(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();

    let first = SnapshotRepo::upsert(&pool, &new_snapshot(record.id, 1, 10))
        .await
        .unwrap()
        .unwrap();
    let second = SnapshotRepo::upsert(&pool, &new_snapshot(record.id, 1, 11))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id, "upsert must reuse the existing row");
    let stored = SnapshotRepo::find_by_record_and_version(&pool, record.id, 1)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.payload, json!({ "intake": { "q1": 11 } }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_upsert_preserves_restoration_source(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();
    SnapshotRepo::upsert(&pool, &new_snapshot(record.id, 2, 20))
        .await
        .unwrap();

    let mut restoration = new_snapshot(record.id, 3, 30);
    restoration.is_restoration = true;
    restoration.restored_from_version = Some(2);
    SnapshotRepo::upsert(&pool, &restoration).await.unwrap();

    let kept = SnapshotRepo::upsert(&pool, &new_snapshot(record.id, 2, 99))
        .await
        .unwrap();
    assert!(kept.is_none());

    let stored = SnapshotRepo::find_by_record_and_version(&pool, record.id, 2)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.payload, json!({ "intake": { "q1": 20 } }));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_restoration_requires_source_version(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();

    let mut invalid = new_snapshot(record.id, 1, 0);
    invalid.is_restoration = true;
    invalid.restored_from_version = None;

    let result = SnapshotRepo::upsert(&pool, &invalid).await;
    assert_matches!(result, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires a PostgreSQL DATABASE_URL"]
async fn test_listings_are_ordered(pool: PgPool) {
    let record = RecordRepo::create(&pool, &new_record(0)).await.unwrap();
    for v in [2, 1, 4, 3] {
        SnapshotRepo::upsert(&pool, &new_snapshot(record.id, v, v.into()))
            .await
            .unwrap();
    }

    let newest_first: Vec<i32> = SnapshotRepo::list_by_record(&pool, record.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.version)
        .collect();
    assert_eq!(newest_first, vec![4, 3, 2, 1]);

    let range: Vec<i32> = SnapshotRepo::list_in_range(&pool, record.id, 2, 3)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.version)
        .collect();
    assert_eq!(range, vec![2, 3]);

    let by_actor = SnapshotRepo::list_by_actor(&pool, "repo-test", 2, 0)
        .await
        .unwrap();
    assert_eq!(by_actor.len(), 2);
    assert!(by_actor.iter().all(|s| s.record_id == record.id));
}
