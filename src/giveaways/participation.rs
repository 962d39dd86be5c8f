use super::audit::{ActionLog, ActionType};
use super::domain::Giveaway;
use super::error::{GiveawayError, GiveawayResult};
use super::status::GiveawayStatus;
use super::store::GiveawayStore;
use crate::utils::logging::log_join;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Whether the giveaway has been posted and `now` falls inside its
/// application window (`publish_date <= now <= application_end_date`).
pub fn accepts_applications(giveaway: &Giveaway, now: DateTime<Utc>) -> bool {
    giveaway.status == GiveawayStatus::Active
        && giveaway.publish_date <= now
        && now <= giveaway.application_end_date
}

/// Admission check run when a user presses the join button.
///
/// Holds no lock of its own: concurrent joins rely on the store's
/// insert-or-ignore being atomic.
#[derive(Clone)]
pub struct ParticipationGate {
    store: Arc<dyn GiveawayStore>,
    actions: Arc<dyn ActionLog>,
}

impl ParticipationGate {
    pub fn new(store: Arc<dyn GiveawayStore>, actions: Arc<dyn ActionLog>) -> Self {
        Self { store, actions }
    }

    /// Adds `user_id` to the giveaway.
    ///
    /// A missing giveaway, one not yet posted, and one outside its
    /// application window all fail with [`GiveawayError::NotFound`]. Joining twice succeeds without a
    /// second record or audit entry.
    pub async fn participate(
        &self,
        giveaway_id: i64,
        user_id: i64,
        now: DateTime<Utc>,
    ) -> GiveawayResult<()> {
        let giveaway = self
            .store
            .get_by_id(giveaway_id)
            .await?
            .ok_or(GiveawayError::NotFound)?;

        if !accepts_applications(&giveaway, now) {
            tracing::debug!(
                "JOIN: user {} rejected for giveaway {} outside application window",
                user_id,
                giveaway_id
            );
            return Err(GiveawayError::NotFound);
        }

        let first_join = self.store.add_participant(giveaway_id, user_id, now).await?;
        log_join(giveaway_id, user_id, first_join);

        if first_join {
            self.actions
                .log(
                    ActionType::GiveawayParticipated,
                    Some(user_id),
                    Some(giveaway_id),
                    "Participate in giveaway",
                )
                .await;
        }

        Ok(())
    }
}
