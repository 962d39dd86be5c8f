use crate::database::models::{GiveawayRow, ParticipantRow, SELECT_GIVEAWAY};
use crate::giveaways::{
    Giveaway, GiveawayDraft, GiveawayPatch, GiveawayStatus, GiveawayStore, Participant, StoreError,
};
use crate::utils::datetime::to_timestamp;
use crate::utils::logging::{log_database_error, log_database_operation};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

/// [`GiveawayStore`] over the SQLite schema in `migrations/`
#[derive(Clone)]
pub struct SqliteGiveawayStore {
    pool: SqlitePool,
}

impl SqliteGiveawayStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        condition: &str,
        status: GiveawayStatus,
        now: DateTime<Utc>,
    ) -> Result<Vec<Giveaway>, StoreError> {
        let query = format!("{SELECT_GIVEAWAY} WHERE ga.status = ? AND {condition} ORDER BY ga.id");
        let rows = sqlx::query_as::<_, GiveawayRow>(&query)
            .bind(status.as_str())
            .bind(to_timestamp(&now))
            .fetch_all(&self.pool)
            .await?;

        log_database_operation("select due", "giveaways", Some(&format!("{status}: {} rows", rows.len())));

        // A corrupt row is reported and left out so the rest of the batch still runs
        let mut giveaways = Vec::with_capacity(rows.len());
        for row in rows {
            match Giveaway::try_from(row) {
                Ok(giveaway) => giveaways.push(giveaway),
                Err(e) => log_database_error("select due", "giveaways", &e.to_string(), None),
            }
        }
        Ok(giveaways)
    }
}

#[async_trait]
impl GiveawayStore for SqliteGiveawayStore {
    async fn create(&self, draft: &GiveawayDraft, now: DateTime<Utc>) -> Result<Giveaway, StoreError> {
        let now = to_timestamp(&now);
        let result = sqlx::query(
            r#"
            INSERT INTO giveaways (
                group_id, admin_user_id, photo_file_id, description,
                publish_date, application_end_date, results_date, is_anonymous,
                status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'scheduled', ?, ?)
            "#,
        )
        .bind(draft.group_id)
        .bind(draft.admin_user_id)
        .bind(&draft.photo_file_id)
        .bind(&draft.description)
        .bind(to_timestamp(&draft.publish_date))
        .bind(to_timestamp(&draft.application_end_date))
        .bind(to_timestamp(&draft.results_date))
        .bind(draft.is_anonymous)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        log_database_operation("insert", "giveaways", Some(&format!("id {id}")));

        self.get_by_id(id)
            .await?
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, StoreError> {
        let query = format!("{SELECT_GIVEAWAY} WHERE ga.id = ?");
        let row = sqlx::query_as::<_, GiveawayRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Giveaway::try_from).transpose()
    }

    async fn list_due_for_publish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.list_where(
            "ga.publish_date <= ? AND g.is_active = TRUE",
            GiveawayStatus::Scheduled,
            now,
        )
        .await
    }

    async fn list_due_for_close(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.list_where("ga.application_end_date <= ?", GiveawayStatus::Active, now)
            .await
    }

    async fn list_due_for_finish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError> {
        self.list_where("ga.results_date <= ?", GiveawayStatus::Closed, now)
            .await
    }

    async fn participants(&self, giveaway_id: i64) -> Result<Vec<Participant>, StoreError> {
        ParticipantRow::find_by_giveaway(&self.pool, giveaway_id)
            .await?
            .into_iter()
            .map(Participant::try_from)
            .collect()
    }

    async fn update(&self, patch: &GiveawayPatch, now: DateTime<Utc>) -> Result<bool, StoreError> {
        // Only the fields carried by the patch are written
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE giveaways SET updated_at = ");
        builder.push_bind(to_timestamp(&now));

        if let Some(status) = patch.status {
            builder.push(", status = ").push_bind(status.as_str());
        }
        if let Some(message_id) = patch.telegram_message_id {
            builder.push(", telegram_message_id = ").push_bind(message_id);
        }
        if let Some(winner) = patch.winner_user_id {
            builder.push(", winner_user_id = ").push_bind(winner);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(patch.id)
            .push(" AND status = ")
            .push_bind(patch.expected.as_str());

        let result = builder.build().execute(&self.pool).await?;
        log_database_operation(
            "update",
            "giveaways",
            Some(&format!("id {} rows {}", patch.id, result.rows_affected())),
        );

        Ok(result.rows_affected() == 1)
    }

    async fn add_participant(
        &self,
        giveaway_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO giveaway_participants (giveaway_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(giveaway_id)
        .bind(user_id)
        .bind(to_timestamp(&now))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
