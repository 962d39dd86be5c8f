#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use lucky_pick_bot::database::audit::SqliteActionLog;
use lucky_pick_bot::database::connection::DatabaseManager;
use lucky_pick_bot::database::models::{Group, User};
use lucky_pick_bot::database::store::SqliteGiveawayStore;
use lucky_pick_bot::giveaways::{
    ActionLog, GatewayError, Giveaway, GiveawayDraft, GiveawayPatch, GiveawayStatus, GiveawayStore,
    MessagingGateway, Participant, StoreError, Winner,
};
use lucky_pick_bot::services::scheduler::{SchedulerService, TaskDeps};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const GROUP_CHAT_ID: i64 = -1001234567890;
pub const ADMIN_ID: i64 = 42;

/// Creates a migrated database in a temporary directory
pub async fn setup_test_db() -> (DatabaseManager, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let db = DatabaseManager::new(&db_url)
        .await
        .expect("Failed to create test database");
    db.run_migrations().await.expect("Failed to run migrations");

    (db, temp_dir)
}

/// Current time truncated to whole seconds, the precision timestamps are stored with
pub fn now_secs() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).expect("valid timestamp")
}

pub async fn seed_group(db: &DatabaseManager, chat_id: i64, active: bool) -> Group {
    let group = Group::enable(&db.pool, chat_id, "Test group", Utc::now().timestamp())
        .await
        .expect("Failed to create group");
    if !active {
        Group::disable(&db.pool, chat_id)
            .await
            .expect("Failed to disable group");
    }
    group
}

pub async fn seed_user(db: &DatabaseManager, user_id: i64, username: Option<&str>) {
    User::upsert(&db.pool, user_id, username, &format!("User {user_id}"), Utc::now().timestamp())
        .await
        .expect("Failed to create user");
}

pub fn draft(
    group_id: i64,
    publish_date: DateTime<Utc>,
    application_end_date: DateTime<Utc>,
    results_date: DateTime<Utc>,
) -> GiveawayDraft {
    GiveawayDraft {
        group_id,
        admin_user_id: ADMIN_ID,
        photo_file_id: "AgACAgIAAxkBAAIBZ2".to_string(),
        description: "Mechanical keyboard".to_string(),
        publish_date,
        application_end_date,
        results_date,
        is_anonymous: false,
    }
}

/// Stores a giveaway and forces it into `status`
pub async fn seed_giveaway(
    db: &DatabaseManager,
    draft: &GiveawayDraft,
    status: GiveawayStatus,
    message_id: Option<i64>,
) -> Giveaway {
    let store = SqliteGiveawayStore::new(db.pool.clone());
    let giveaway = store
        .create(draft, Utc::now())
        .await
        .expect("Failed to create giveaway");

    sqlx::query("UPDATE giveaways SET status = ?, telegram_message_id = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(message_id)
        .bind(giveaway.id)
        .execute(&db.pool)
        .await
        .expect("Failed to set status");

    store
        .get_by_id(giveaway.id)
        .await
        .expect("Failed to reload giveaway")
        .expect("Giveaway disappeared")
}

/// Adds `count` users to a giveaway, ids starting at `first_user_id`
pub async fn seed_participants(db: &DatabaseManager, giveaway_id: i64, first_user_id: i64, count: i64) {
    let store = SqliteGiveawayStore::new(db.pool.clone());
    for user_id in first_user_id..first_user_id + count {
        seed_user(db, user_id, Some(&format!("user{user_id}"))).await;
        store
            .add_participant(giveaway_id, user_id, Utc::now() - Duration::minutes(30))
            .await
            .expect("Failed to add participant");
    }
}

pub async fn status_of(db: &DatabaseManager, giveaway_id: i64) -> GiveawayStatus {
    SqliteGiveawayStore::new(db.pool.clone())
        .get_by_id(giveaway_id)
        .await
        .expect("Failed to load giveaway")
        .expect("Giveaway missing")
        .status
}

/// A call made to the recording gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Publish { giveaway_id: i64 },
    Pin { chat_id: i64, message_id: i64 },
    Unpin { chat_id: i64, message_id: i64 },
    NotifyWinner { giveaway_id: i64, winner_user_id: Option<i64> },
}

/// In-memory gateway recording every call, with per-call failure switches
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<GatewayCall>>,
    next_message_id: AtomicI64,
    pub fail_publish_for: Mutex<HashSet<i64>>,
    pub fail_pin: AtomicBool,
    pub fail_unpin: AtomicBool,
    pub fail_notify: AtomicBool,
    /// Time each `publish` takes, in milliseconds
    pub publish_delay_ms: AtomicU64,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn publish_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, GatewayCall::Publish { .. }))
            .count()
    }

    pub fn notifications(&self) -> Vec<GatewayCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, GatewayCall::NotifyWinner { .. }))
            .collect()
    }

    pub fn fail_publish(&self, giveaway_id: i64) {
        self.fail_publish_for.lock().expect("fail lock").insert(giveaway_id);
    }

    pub fn heal_publish(&self, giveaway_id: i64) {
        self.fail_publish_for.lock().expect("fail lock").remove(&giveaway_id);
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().expect("calls lock").push(call);
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn publish(&self, giveaway: &Giveaway) -> Result<i64, GatewayError> {
        self.record(GatewayCall::Publish { giveaway_id: giveaway.id });
        let delay = self.publish_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }
        if self.fail_publish_for.lock().expect("fail lock").contains(&giveaway.id) {
            return Err(GatewayError::Rejected("chat not found".to_string()));
        }
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn pin(&self, chat_id: i64, message_id: i64) -> Result<(), GatewayError> {
        self.record(GatewayCall::Pin { chat_id, message_id });
        if self.fail_pin.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("not enough rights to pin".to_string()));
        }
        Ok(())
    }

    async fn unpin(&self, chat_id: i64, message_id: i64) -> Result<(), GatewayError> {
        self.record(GatewayCall::Unpin { chat_id, message_id });
        if self.fail_unpin.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("message to unpin not found".to_string()));
        }
        Ok(())
    }

    async fn notify_winner(&self, winner: &Winner) -> Result<(), GatewayError> {
        self.record(GatewayCall::NotifyWinner {
            giveaway_id: winner.giveaway.id,
            winner_user_id: winner.participant.as_ref().map(|p| p.user_id),
        });
        if self.fail_notify.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("bot was kicked".to_string()));
        }
        Ok(())
    }
}

/// Store wrapper whose `update` fails for selected giveaways
pub struct FlakyStore {
    inner: SqliteGiveawayStore,
    pub fail_update_for: Mutex<HashSet<i64>>,
}

impl FlakyStore {
    pub fn new(db: &DatabaseManager) -> Self {
        Self {
            inner: SqliteGiveawayStore::new(db.pool.clone()),
            fail_update_for: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_update(&self, giveaway_id: i64) {
        self.fail_update_for.lock().expect("fail lock").insert(giveaway_id);
    }

    pub fn heal_update(&self, giveaway_id: i64) {
        self.fail_update_for.lock().expect("fail lock").remove(&giveaway_id);
    }
}

#[async_trait]
impl GiveawayStore for FlakyStore {
    async fn create(&self, draft: &GiveawayDraft, now: DateTime<Utc>) -> Result<Giveaway, StoreError> {
        self.inner.create(draft, now).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, StoreError> {
        self.inner.get_by_id(id).await
    }

    async fn list_due_for_publish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.inner.list_due_for_publish(now).await
    }

    async fn list_due_for_close(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.inner.list_due_for_close(now).await
    }

    async fn list_due_for_finish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.inner.list_due_for_finish(now).await
    }

    async fn participants(&self, giveaway_id: i64) -> Result<Vec<Participant>, StoreError> {
        self.inner.participants(giveaway_id).await
    }

    async fn update(&self, patch: &GiveawayPatch, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if self.fail_update_for.lock().expect("fail lock").contains(&patch.id) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.update(patch, now).await
    }

    async fn add_participant(
        &self,
        giveaway_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        self.inner.add_participant(giveaway_id, user_id, now).await
    }
}

/// Scheduler over the SQLite store and action log with a recording gateway
pub fn scheduler_with(
    db: &DatabaseManager,
    store: Arc<dyn GiveawayStore>,
    gateway: Arc<RecordingGateway>,
) -> SchedulerService {
    let actions: Arc<dyn ActionLog> = Arc::new(SqliteActionLog::new(db.pool.clone()));
    SchedulerService::with_default_tasks(
        TaskDeps::new(store, gateway, actions),
        std::time::Duration::from_secs(60),
    )
}

pub fn sqlite_store(db: &DatabaseManager) -> Arc<dyn GiveawayStore> {
    Arc::new(SqliteGiveawayStore::new(db.pool.clone()))
}
