use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A Telegram user; `id` is the Telegram user id
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub registered_at: i64,
}

impl User {
    /// Creates the user or refreshes their display fields
    pub async fn upsert(
        pool: &sqlx::SqlitePool,
        id: i64,
        username: Option<&str>,
        first_name: &str,
        now: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, first_name, registered_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                username = excluded.username,
                first_name = excluded.first_name
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(first_name)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(pool: &sqlx::SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, first_name, registered_at FROM users WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
