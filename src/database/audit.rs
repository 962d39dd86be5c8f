use crate::database::models::ActionLogEntry;
use crate::giveaways::{ActionLog, ActionType};
use crate::utils::logging::{log_database_error, log_database_operation};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// [`ActionLog`] writing to the `action_logs` table
#[derive(Clone)]
pub struct SqliteActionLog {
    pool: SqlitePool,
}

impl SqliteActionLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActionLog for SqliteActionLog {
    async fn log(
        &self,
        action: ActionType,
        user_id: Option<i64>,
        giveaway_id: Option<i64>,
        description: &str,
    ) {
        match ActionLogEntry::create(
            &self.pool,
            giveaway_id,
            user_id,
            action.as_str(),
            description,
            Utc::now().timestamp(),
        )
        .await
        {
            Ok(_) => log_database_operation("insert", "action_logs", Some(action.as_str())),
            Err(e) => log_database_error(
                "insert",
                "action_logs",
                &e.to_string(),
                Some(&format!("{action} giveaway {giveaway_id:?} user {user_id:?}")),
            ),
        }
    }
}
