use super::error::{GiveawayError, GiveawayResult};
use super::status::GiveawayStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest description accepted for a giveaway post (Telegram caption limit
/// minus room for the dates footer).
pub const MAX_DESCRIPTION_LEN: usize = 900;

/// A giveaway as prepared by an admin, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiveawayDraft {
    pub group_id: i64,
    pub admin_user_id: i64,
    pub photo_file_id: String,
    pub description: String,
    pub publish_date: DateTime<Utc>,
    pub application_end_date: DateTime<Utc>,
    pub results_date: DateTime<Utc>,
    pub is_anonymous: bool,
}

impl GiveawayDraft {
    /// Checks the fields the lifecycle relies on.
    ///
    /// The three dates must be strictly ordered
    /// (`publish < application end < results`); the time-based transitions
    /// assume it and never re-check.
    pub fn validate(&self) -> GiveawayResult<()> {
        if self.photo_file_id.trim().is_empty() {
            return Err(GiveawayError::Validation("a photo is required".to_string()));
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err(GiveawayError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(GiveawayError::Validation(format!(
                "description cannot be longer than {MAX_DESCRIPTION_LEN} characters"
            )));
        }

        if self.publish_date >= self.application_end_date {
            return Err(GiveawayError::Validation(
                "applications must end after the publish date".to_string(),
            ));
        }
        if self.application_end_date >= self.results_date {
            return Err(GiveawayError::Validation(
                "results must come after applications end".to_string(),
            ));
        }

        Ok(())
    }
}

/// A stored giveaway, joined with the owning group's chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Giveaway {
    pub id: i64,
    pub group_id: i64,
    pub group_chat_id: i64,
    pub group_active: bool,
    pub admin_user_id: i64,
    pub photo_file_id: String,
    pub description: String,
    pub publish_date: DateTime<Utc>,
    pub application_end_date: DateTime<Utc>,
    pub results_date: DateTime<Utc>,
    pub is_anonymous: bool,
    pub telegram_message_id: Option<i64>,
    pub winner_user_id: Option<i64>,
    pub status: GiveawayStatus,
    pub created_at: DateTime<Utc>,
}

/// A user's application to a giveaway, with display fields of the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: i64,
    pub giveaway_id: i64,
    /// Telegram user id
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Outcome of a finished draw. `participant` is `None` when nobody applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub giveaway: Giveaway,
    pub participant: Option<Participant>,
}

/// Field-level update of a giveaway row.
///
/// Only the `Some` fields are written, and only while the row is still in
/// `expected` status, so a transition that was already applied is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiveawayPatch {
    pub id: i64,
    pub expected: GiveawayStatus,
    pub status: Option<GiveawayStatus>,
    pub telegram_message_id: Option<i64>,
    pub winner_user_id: Option<i64>,
}

impl GiveawayPatch {
    /// Mirrors the patch onto an in-memory copy of the row
    pub fn apply_to(&self, giveaway: &mut Giveaway) {
        if let Some(status) = self.status {
            giveaway.status = status;
        }
        if let Some(message_id) = self.telegram_message_id {
            giveaway.telegram_message_id = Some(message_id);
        }
        if let Some(winner) = self.winner_user_id {
            giveaway.winner_user_id = Some(winner);
        }
    }
}
