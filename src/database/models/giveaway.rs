use crate::giveaways::{Giveaway, GiveawayStatus, Participant, StoreError};
use crate::utils::datetime::from_timestamp;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Columns selected for every giveaway read, joined with the owning group
pub(crate) const SELECT_GIVEAWAY: &str = r#"
    SELECT ga.id, ga.group_id, g.telegram_chat_id AS group_chat_id, g.is_active AS group_active,
           ga.admin_user_id, ga.photo_file_id, ga.description,
           ga.publish_date, ga.application_end_date, ga.results_date, ga.is_anonymous,
           ga.telegram_message_id, ga.winner_user_id, ga.status, ga.created_at
    FROM giveaways ga
    JOIN groups g ON g.id = ga.group_id
"#;

/// Raw `giveaways` row joined with its group
#[derive(Debug, Clone, FromRow)]
pub struct GiveawayRow {
    pub id: i64,
    pub group_id: i64,
    pub group_chat_id: i64,
    pub group_active: bool,
    pub admin_user_id: i64,
    pub photo_file_id: String,
    pub description: String,
    pub publish_date: i64,
    pub application_end_date: i64,
    pub results_date: i64,
    pub is_anonymous: bool,
    pub telegram_message_id: Option<i64>,
    pub winner_user_id: Option<i64>,
    pub status: String,
    pub created_at: i64,
}

fn timestamp(id: i64, column: &str, secs: i64) -> Result<DateTime<Utc>, StoreError> {
    from_timestamp(secs).ok_or_else(|| StoreError::Corrupt {
        id,
        reason: format!("{column} out of range: {secs}"),
    })
}

impl TryFrom<GiveawayRow> for Giveaway {
    type Error = StoreError;

    fn try_from(row: GiveawayRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<GiveawayStatus>()
            .map_err(|e| StoreError::Corrupt {
                id: row.id,
                reason: e.to_string(),
            })?;

        Ok(Giveaway {
            id: row.id,
            group_id: row.group_id,
            group_chat_id: row.group_chat_id,
            group_active: row.group_active,
            admin_user_id: row.admin_user_id,
            photo_file_id: row.photo_file_id,
            description: row.description,
            publish_date: timestamp(row.id, "publish_date", row.publish_date)?,
            application_end_date: timestamp(row.id, "application_end_date", row.application_end_date)?,
            results_date: timestamp(row.id, "results_date", row.results_date)?,
            is_anonymous: row.is_anonymous,
            telegram_message_id: row.telegram_message_id,
            winner_user_id: row.winner_user_id,
            status,
            created_at: timestamp(row.id, "created_at", row.created_at)?,
        })
    }
}

/// `giveaway_participants` row joined with the user's display fields
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub id: i64,
    pub giveaway_id: i64,
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub joined_at: i64,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = StoreError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(Participant {
            id: row.id,
            giveaway_id: row.giveaway_id,
            user_id: row.user_id,
            username: row.username,
            first_name: row.first_name,
            joined_at: timestamp(row.giveaway_id, "joined_at", row.joined_at)?,
        })
    }
}

impl ParticipantRow {
    pub async fn find_by_giveaway(
        pool: &sqlx::SqlitePool,
        giveaway_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT gap.id, gap.giveaway_id, gap.user_id, u.username,
                   COALESCE(u.first_name, '') AS first_name, gap.joined_at
            FROM giveaway_participants gap
            LEFT JOIN users u ON u.id = gap.user_id
            WHERE gap.giveaway_id = ?
            ORDER BY gap.joined_at, gap.id
            "#,
        )
        .bind(giveaway_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_by_giveaway(pool: &sqlx::SqlitePool, giveaway_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM giveaway_participants WHERE giveaway_id = ?")
            .bind(giveaway_id)
            .fetch_one(pool)
            .await
    }
}
