use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ActionLogEntry {
    pub id: i64,
    pub giveaway_id: Option<i64>,
    pub user_id: Option<i64>,
    pub action_type: String,
    pub description: String,
    pub created_at: i64,
}

impl ActionLogEntry {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        giveaway_id: Option<i64>,
        user_id: Option<i64>,
        action_type: &str,
        description: &str,
        now: i64,
    ) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO action_logs (giveaway_id, user_id, action_type, description, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(giveaway_id)
        .bind(user_id)
        .bind(action_type)
        .bind(description)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find_by_giveaway(
        pool: &sqlx::SqlitePool,
        giveaway_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ActionLogEntry>(
            "SELECT id, giveaway_id, user_id, action_type, description, created_at FROM action_logs WHERE giveaway_id = ? ORDER BY id"
        )
        .bind(giveaway_id)
        .fetch_all(pool)
        .await
    }
}
