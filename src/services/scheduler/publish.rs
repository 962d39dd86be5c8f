use super::task::{ItemOutcome, ShutdownSignal, Task, TaskDeps, TaskReport};
use crate::giveaways::lifecycle::{self, Transition};
use crate::giveaways::{Giveaway, GiveawayResult, StoreError};
use crate::utils::logging::{
    log_side_effect_failure, log_transition, log_transition_failure, log_transition_stale,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// `scheduled -> active`: posts and pins the giveaway, then stores the
/// message id
pub struct PublishTask {
    deps: TaskDeps,
}

impl PublishTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self { deps }
    }

    async fn publish_one(&self, giveaway: &Giveaway, now: DateTime<Utc>) -> GiveawayResult<ItemOutcome> {
        lifecycle::ensure_can(giveaway, Transition::Publish)?;

        let message_id = self.deps.gateway.publish(giveaway).await?;

        if let Err(e) = self.deps.gateway.pin(giveaway.group_chat_id, message_id).await {
            log_side_effect_failure("pin", giveaway.id, &e.to_string());
        }

        let patch = lifecycle::publish(giveaway, message_id)?;
        let applied = match self.deps.store.update(&patch, now).await {
            Ok(applied) => applied,
            Err(e) => {
                tracing::warn!(
                    "Giveaway {} was posted as message {} but not stored, it may be posted again next tick",
                    giveaway.id,
                    message_id
                );
                return Err(e.into());
            }
        };

        if !applied {
            log_transition_stale(self.name(), giveaway.id, patch.expected);
            return Ok(ItemOutcome::Stale);
        }

        log_transition(
            giveaway.id,
            Transition::Publish.from_status(),
            Transition::Publish.to_status(),
            Some(&format!("message {message_id}")),
        );
        self.deps
            .actions
            .log(
                Transition::Publish.action(),
                Some(giveaway.admin_user_id),
                Some(giveaway.id),
                &format!("Published giveaway as message {message_id}"),
            )
            .await;

        Ok(ItemOutcome::Applied)
    }
}

#[async_trait]
impl Task for PublishTask {
    fn name(&self) -> &'static str {
        "publish"
    }

    async fn run(&self, now: DateTime<Utc>, shutdown: &ShutdownSignal) -> Result<TaskReport, StoreError> {
        let due = self.deps.store.list_due_for_publish(now).await?;
        let mut report = TaskReport::default();

        for giveaway in &due {
            if shutdown.is_shutdown() {
                break;
            }
            match self.publish_one(giveaway, now).await {
                Ok(outcome) => report.record(outcome),
                Err(e) => {
                    log_transition_failure(self.name(), giveaway.id, &e.to_string());
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}
