use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub telegram_chat_id: i64,
    pub title: String,
    pub is_active: bool,
    pub created_at: i64,
}

impl Group {
    pub async fn find_by_chat_id(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, telegram_chat_id, title, is_active, created_at FROM groups WHERE telegram_chat_id = ?"
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    /// Registers the group, or re-activates it and refreshes its title
    pub async fn enable(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        title: &str,
        now: i64,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO groups (telegram_chat_id, title, is_active, created_at)
            VALUES (?, ?, TRUE, ?)
            ON CONFLICT (telegram_chat_id) DO UPDATE SET title = excluded.title, is_active = TRUE
            "#,
        )
        .bind(chat_id)
        .bind(title)
        .bind(now)
        .execute(pool)
        .await?;

        Self::find_by_chat_id(pool, chat_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Marks the group inactive; its scheduled giveaways stop being published
    pub async fn disable(pool: &sqlx::SqlitePool, chat_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE groups SET is_active = FALSE WHERE telegram_chat_id = ?")
            .bind(chat_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GroupSetting {
    pub group_id: i64,
    pub key: String,
    pub value: String,
}

impl GroupSetting {
    /// All raw settings of a group as a key/value map
    pub async fn load_map(
        pool: &sqlx::SqlitePool,
        group_id: i64,
    ) -> Result<HashMap<String, String>, sqlx::Error> {
        let rows = sqlx::query_as::<_, GroupSetting>(
            "SELECT group_id, key, value FROM group_settings WHERE group_id = ?"
        )
        .bind(group_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|row| (row.key, row.value)).collect())
    }

    pub async fn set(
        pool: &sqlx::SqlitePool,
        group_id: i64,
        key: &str,
        value: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO group_settings (group_id, key, value) VALUES (?, ?, ?)
            ON CONFLICT (group_id, key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(group_id)
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;

        Ok(())
    }
}
