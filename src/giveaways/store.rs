use super::domain::{Giveaway, GiveawayDraft, GiveawayPatch, Participant};
use super::error::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence of giveaways and their participants.
#[async_trait]
pub trait GiveawayStore: Send + Sync {
    /// Stores a validated draft in `scheduled` status
    async fn create(&self, draft: &GiveawayDraft, now: DateTime<Utc>) -> Result<Giveaway, StoreError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Giveaway>, StoreError>;

    /// `scheduled`, publish date reached, group active
    async fn list_due_for_publish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError>;

    /// `active`, application end date reached
    async fn list_due_for_close(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError>;

    /// `closed`, results date reached
    async fn list_due_for_finish(&self, now: DateTime<Utc>) -> Result<Vec<Giveaway>, StoreError>;

    /// Participants in join order
    async fn participants(&self, giveaway_id: i64) -> Result<Vec<Participant>, StoreError>;

    /// Applies a patch; `false` when the row was no longer in the expected status
    async fn update(&self, patch: &GiveawayPatch, now: DateTime<Utc>) -> Result<bool, StoreError>;

    /// Insert-or-ignore; `true` only for a first-time join
    async fn add_participant(
        &self,
        giveaway_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError>;
}
