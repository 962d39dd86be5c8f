mod common;

use chrono::Duration;
use common::*;
use lucky_pick_bot::database::audit::SqliteActionLog;
use lucky_pick_bot::database::models::{ActionLogEntry, ParticipantRow};
use lucky_pick_bot::giveaways::{GiveawayError, GiveawayStatus, ParticipationGate};
use std::sync::Arc;

fn gate(db: &lucky_pick_bot::database::connection::DatabaseManager) -> ParticipationGate {
    ParticipationGate::new(sqlite_store(db), Arc::new(SqliteActionLog::new(db.pool.clone())))
}

#[tokio::test]
async fn test_join_open_giveaway() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, true).await;
    let now = now_secs();
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, now - Duration::hours(1), now + Duration::hours(1), now + Duration::hours(2)),
        GiveawayStatus::Active,
        Some(1),
    )
    .await;
    seed_user(&db, 501, Some("anna")).await;

    gate(&db)
        .participate(giveaway.id, 501, now)
        .await
        .expect("join should succeed");

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 1);

    let entries = ActionLogEntry::find_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action_type, "giveaway.participated");
    assert_eq!(entries[0].user_id, Some(501));
}

#[tokio::test]
async fn test_rejoin_is_success_without_second_record() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, true).await;
    let now = now_secs();
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, now - Duration::hours(1), now + Duration::hours(1), now + Duration::hours(2)),
        GiveawayStatus::Active,
        Some(1),
    )
    .await;
    seed_user(&db, 501, None).await;
    let gate = gate(&db);

    gate.participate(giveaway.id, 501, now).await.expect("first join");
    gate.participate(giveaway.id, 501, now + Duration::minutes(5))
        .await
        .expect("second join");

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 1);

    let entries = ActionLogEntry::find_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_outside_window_looks_like_missing_giveaway() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, true).await;
    let now = now_secs();
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, now + Duration::hours(1), now + Duration::hours(2), now + Duration::hours(3)),
        GiveawayStatus::Scheduled,
        None,
    )
    .await;
    seed_user(&db, 501, None).await;
    let gate = gate(&db);

    let too_early = gate.participate(giveaway.id, 501, now).await;
    let too_late = gate
        .participate(giveaway.id, 501, now + Duration::hours(2) + Duration::seconds(1))
        .await;
    let missing = gate.participate(giveaway.id + 1000, 501, now).await;

    assert!(matches!(too_early, Err(GiveawayError::NotFound)));
    assert!(matches!(too_late, Err(GiveawayError::NotFound)));
    assert!(matches!(missing, Err(GiveawayError::NotFound)));

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 0);
    let entries = ActionLogEntry::find_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_unposted_giveaway_rejects_joins_inside_window() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, false).await;
    let now = now_secs();
    // Publish date passed, but the disabled group kept it from being posted
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, now - Duration::hours(1), now + Duration::hours(1), now + Duration::hours(2)),
        GiveawayStatus::Scheduled,
        None,
    )
    .await;
    seed_user(&db, 501, None).await;

    let result = gate(&db).participate(giveaway.id, 501, now).await;
    assert!(matches!(result, Err(GiveawayError::NotFound)));

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn test_window_bounds_are_inclusive() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, true).await;
    let now = now_secs();
    let publish = now + Duration::hours(1);
    let end = now + Duration::hours(2);
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, publish, end, now + Duration::hours(3)),
        GiveawayStatus::Active,
        Some(1),
    )
    .await;
    seed_user(&db, 1, None).await;
    seed_user(&db, 2, None).await;
    let gate = gate(&db);

    gate.participate(giveaway.id, 1, publish).await.expect("join at publish date");
    gate.participate(giveaway.id, 2, end).await.expect("join at application end");

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn test_concurrent_joins_store_one_record() {
    let (db, _temp_dir) = setup_test_db().await;
    let group = seed_group(&db, GROUP_CHAT_ID, true).await;
    let now = now_secs();
    let giveaway = seed_giveaway(
        &db,
        &draft(group.id, now - Duration::hours(1), now + Duration::hours(1), now + Duration::hours(2)),
        GiveawayStatus::Active,
        Some(1),
    )
    .await;
    seed_user(&db, 777, Some("eager")).await;
    let gate = gate(&db);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let gate = gate.clone();
            tokio::spawn(async move { gate.participate(giveaway.id, 777, now).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task panicked").expect("join should succeed");
    }

    let count = ParticipantRow::count_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(count, 1);
    let entries = ActionLogEntry::find_by_giveaway(&db.pool, giveaway.id).await.unwrap();
    assert_eq!(entries.len(), 1);
}
