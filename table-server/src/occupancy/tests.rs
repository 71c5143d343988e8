use std::sync::Arc;

use shared::error::ErrorCode;
use shared::models::{
    OccupancyKind, OccupancyStatus, ReservationCreate, TableStatus, VacantLabel, WalkinCreate,
};
use sqlx::SqlitePool;

use super::*;
use crate::db::repository::occupancy as occupancy_repo;
use crate::tables::TableRegistry;
use crate::test_support::{count, setup, utc};
use crate::utils::ManualClock;

fn ledger(pool: &SqlitePool, clock: &Arc<ManualClock>) -> OccupancyLedger {
    OccupancyLedger::new(pool.clone(), clock.clone(), LedgerSettings::default())
}

fn reservation(table_id: i64, start: i64, end: i64) -> ReservationCreate {
    ReservationCreate {
        table_id,
        branch_id: None,
        national_id: Some("1001".into()),
        name: Some("Ana".into()),
        phone: None,
        email: None,
        start,
        end,
        party_size: Some(4),
        notes: None,
    }
}

fn walkin(table_id: i64, name: &str) -> WalkinCreate {
    WalkinCreate {
        table_id,
        branch_id: None,
        national_id: None,
        name: Some(name.into()),
        phone: None,
        email: None,
        party_size: Some(2),
        notes: None,
    }
}

/// Cached flag must equal "no current occupant" by the resolver
async fn assert_flag_matches_ledger(pool: &SqlitePool, clock: &ManualClock, table_id: i64) {
    let registry = TableRegistry::new(pool.clone(), Arc::new(ManualClock::new(clock.now_millis())));
    let records = occupancy_repo::find_open_by_table(pool, table_id).await.unwrap();
    let expected = resolver::resolve_current(&records, clock.now_millis()).is_none();
    assert_eq!(registry.is_available(table_id).await.unwrap(), expected);
}

#[tokio::test]
async fn test_reservation_lifecycle() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);
    let registry = TableRegistry::new(pool.clone(), clock.clone());

    let record = ledger
        .create_reservation(reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap();
    assert_eq!(record.status, OccupancyStatus::Pending);
    assert!(record.customer_id.is_some());
    // not started yet: table still free
    assert!(registry.is_available(1).await.unwrap());

    clock.set(utc(2024, 1, 1, 19, 5));
    match ledger.current_status(1).await.unwrap() {
        TableStatus::Occupied { status, start, walkin, .. } => {
            assert_eq!(status, OccupancyStatus::Pending);
            assert_eq!(start, utc(2024, 1, 1, 19, 0));
            assert!(!walkin);
        }
        other => panic!("expected occupied, got {other:?}"),
    }

    let served = ledger.advance_status(1, OccupancyStatus::Served).await.unwrap();
    assert_eq!(served.record_id, record.id);
    assert!(!served.available);
    assert!(!registry.is_available(1).await.unwrap());
    assert_flag_matches_ledger(&pool, &clock, 1).await;

    clock.set(utc(2024, 1, 1, 20, 30));
    let finished = ledger.advance_status(1, OccupancyStatus::Finished).await.unwrap();
    assert_eq!(finished.end, Some(utc(2024, 1, 1, 20, 30)));
    assert!(registry.is_available(1).await.unwrap());
    assert_flag_matches_ledger(&pool, &clock, 1).await;

    let stored = occupancy_repo::find_by_id(&pool, record.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OccupancyStatus::Finished);
    assert_eq!(stored.end(), Some(utc(2024, 1, 1, 20, 30)));
}

#[tokio::test]
async fn test_walkin_is_current_immediately() {
    let (pool, clock) = setup(utc(2024, 1, 1, 13, 0)).await;
    let ledger = ledger(&pool, &clock);

    let record = ledger.create_walkin(walkin(2, "Luis")).await.unwrap();
    assert!(matches!(record.kind, OccupancyKind::Walkin { arrived_at, left_at: None } if arrived_at == utc(2024, 1, 1, 13, 0)));
    assert!(record.customer_id.is_none());

    match ledger.current_status(2).await.unwrap() {
        TableStatus::Occupied { status, end, walkin, customer, .. } => {
            assert_eq!(status, OccupancyStatus::Pending);
            assert_eq!(end, None);
            assert!(walkin);
            assert_eq!(customer.as_deref(), Some("Luis"));
        }
        other => panic!("expected occupied, got {other:?}"),
    }
    assert_flag_matches_ledger(&pool, &clock, 2).await;
}

#[tokio::test]
async fn test_advance_without_occupant_is_conflict_and_writes_nothing() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);

    // future reservation does not count as current
    ledger
        .create_reservation(reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap();
    let before: (bool, i64) = sqlx::query_as("SELECT available, updated_at FROM dining_table WHERE id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();

    for status in [OccupancyStatus::Finished, OccupancyStatus::Served] {
        clock.advance_minutes(1);
        let err = ledger.advance_status(1, status).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NoActiveOccupant);
    }

    let after: (bool, i64) = sqlx::query_as("SELECT available, updated_at FROM dining_table WHERE id = 1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(before, after);
    let pending: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM occupancy WHERE status = 'pending'")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn test_finish_closes_walkin_before_reservation() {
    let (pool, clock) = setup(utc(2024, 1, 1, 18, 0)).await;
    let ledger = ledger(&pool, &clock);

    let walk = ledger.create_walkin(walkin(1, "Luis")).await.unwrap();
    let mut later = reservation(1, utc(2024, 1, 1, 20, 0), utc(2024, 1, 1, 22, 0));
    later.national_id = Some("2002".into());
    let booked = ledger.create_reservation(later).await.unwrap();

    // both qualify at 20:10, the walk-in wins
    clock.set(utc(2024, 1, 1, 20, 10));
    let first = ledger.advance_status(1, OccupancyStatus::Finished).await.unwrap();
    assert_eq!(first.record_id, walk.id);
    // the reservation now holds the table
    assert!(!first.available);
    assert_flag_matches_ledger(&pool, &clock, 1).await;

    let second = ledger.advance_status(1, OccupancyStatus::Cancelled).await.unwrap();
    assert_eq!(second.record_id, booked.id);
    assert!(second.available);
    assert_flag_matches_ledger(&pool, &clock, 1).await;
}

#[tokio::test]
async fn test_reservation_validation() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);

    let err = ledger
        .create_reservation(reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 19, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidWindow);

    let err = ledger
        .create_reservation(reservation(1, utc(2024, 1, 1, 9, 0), utc(2024, 1, 1, 10, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidWindow);

    let err = ledger
        .create_reservation(reservation(99, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::TableNotFound);

    let mut wrong_branch = reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0));
    wrong_branch.branch_id = Some(7);
    let err = ledger.create_reservation(wrong_branch).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ValidationFailed);

    assert_eq!(count(&pool, "occupancy").await, 0);
    assert_eq!(count(&pool, "customer").await, 0);
}

#[tokio::test]
async fn test_overlapping_reservation_rejected_unless_allowed() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let strict = ledger(&pool, &clock);

    strict
        .create_reservation(reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap();
    let err = strict
        .create_reservation(reservation(1, utc(2024, 1, 1, 20, 0), utc(2024, 1, 1, 22, 0)))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReservationConflict);

    // back-to-back windows do not overlap
    strict
        .create_reservation(reservation(1, utc(2024, 1, 1, 21, 0), utc(2024, 1, 1, 23, 0)))
        .await
        .unwrap();

    let lenient = OccupancyLedger::new(
        pool.clone(),
        clock.clone(),
        LedgerSettings {
            allow_double_booking: true,
            ..LedgerSettings::default()
        },
    );
    lenient
        .create_reservation(reservation(1, utc(2024, 1, 1, 20, 0), utc(2024, 1, 1, 22, 0)))
        .await
        .unwrap();
    assert_eq!(count(&pool, "occupancy").await, 3);
}

#[tokio::test]
async fn test_second_walkin_on_same_table_rejected() {
    let (pool, clock) = setup(utc(2024, 1, 1, 13, 0)).await;
    let ledger = ledger(&pool, &clock);

    let first = ledger.create_walkin(walkin(1, "Luis")).await.unwrap();
    let err = ledger.create_walkin(walkin(1, "Marta")).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::TableOccupied);

    ledger.advance_status(1, OccupancyStatus::Finished).await.unwrap();
    let second = ledger.create_walkin(walkin(1, "Marta")).await.unwrap();
    assert_ne!(first.id, second.id);
}

#[tokio::test]
async fn test_vacant_label_follows_cached_flag() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);

    ledger
        .create_reservation(reservation(2, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap();
    match ledger.current_status(2).await.unwrap() {
        TableStatus::Vacant { label, next_scheduled, .. } => {
            assert_eq!(label, VacantLabel::Free);
            let next = next_scheduled.unwrap();
            assert_eq!(next.start, utc(2024, 1, 1, 19, 0));
            assert_eq!(next.customer.as_deref(), Some("Ana"));
        }
        other => panic!("expected vacant, got {other:?}"),
    }

    // drift the cache by hand: the label reports it
    sqlx::query("UPDATE dining_table SET available = 0 WHERE id = 2")
        .execute(&pool)
        .await
        .unwrap();
    match ledger.current_status(2).await.unwrap() {
        TableStatus::Vacant { label, .. } => assert_eq!(label, VacantLabel::Pending),
        other => panic!("expected vacant, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reservation_upserts_customer_in_same_transaction() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);

    let mut req = reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0));
    req.phone = Some("555-0101".into());
    let record = ledger.create_reservation(req).await.unwrap();

    let (name, phone): (Option<String>, Option<String>) =
        sqlx::query_as("SELECT name, phone FROM customer WHERE id = ?")
            .bind(record.customer_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(name.as_deref(), Some("Ana"));
    assert_eq!(phone.as_deref(), Some("555-0101"));
    assert_eq!(record.national_id.as_deref(), Some("1001"));
}

#[tokio::test]
async fn test_visits_today_lists_open_records_of_the_day() {
    let (pool, clock) = setup(utc(2024, 1, 1, 12, 0)).await;
    let ledger = ledger(&pool, &clock);

    ledger
        .create_reservation(reservation(1, utc(2024, 1, 1, 19, 0), utc(2024, 1, 1, 21, 0)))
        .await
        .unwrap();
    let mut tomorrow = reservation(1, utc(2024, 1, 2, 19, 0), utc(2024, 1, 2, 21, 0));
    tomorrow.national_id = Some("2002".into());
    ledger.create_reservation(tomorrow).await.unwrap();
    ledger.create_walkin(walkin(2, "Luis")).await.unwrap();
    ledger.advance_status(2, OccupancyStatus::Cancelled).await.unwrap();

    let visits = ledger.visits_today().await.unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0].table_id, 1);
    assert_eq!(visits[0].customer.as_deref(), Some("Ana"));
}

#[tokio::test]
async fn test_concurrent_walkins_one_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("occupancy.db");
    let db = crate::db::DbService::new(path.to_str().unwrap()).await.unwrap();
    crate::test_support::seed_branch(&db.pool, 1, "Centro").await;
    crate::test_support::seed_table(&db.pool, 1, 1, 4).await;
    let clock = Arc::new(ManualClock::new(utc(2024, 1, 1, 13, 0)));
    let ledger = ledger(&db.pool, &clock);

    let mut handles = Vec::new();
    for i in 0..8 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.create_walkin(walkin(1, &format!("guest-{i}"))).await
        }));
    }
    let mut ok = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(e) => assert!(matches!(
                e.code(),
                ErrorCode::TableOccupied | ErrorCode::SystemBusy
            )),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(count(&db.pool, "occupancy").await, 1);
    assert_flag_matches_ledger(&db.pool, &clock, 1).await;
}
