use super::task::{ItemOutcome, ShutdownSignal, Task, TaskDeps, TaskReport};
use crate::giveaways::lifecycle::{self, Transition};
use crate::giveaways::{Giveaway, GiveawayResult, StoreError};
use crate::utils::logging::{
    log_side_effect_failure, log_transition, log_transition_failure, log_transition_stale,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// `active -> closed`: unpins the post and stops accepting applications
pub struct CloseTask {
    deps: TaskDeps,
}

impl CloseTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self { deps }
    }

    async fn close_one(&self, giveaway: &Giveaway, now: DateTime<Utc>) -> GiveawayResult<ItemOutcome> {
        let patch = lifecycle::close(giveaway)?;

        if let Some(message_id) = giveaway.telegram_message_id {
            if let Err(e) = self.deps.gateway.unpin(giveaway.group_chat_id, message_id).await {
                log_side_effect_failure("unpin", giveaway.id, &e.to_string());
            }
        }

        if !self.deps.store.update(&patch, now).await? {
            log_transition_stale(self.name(), giveaway.id, patch.expected);
            return Ok(ItemOutcome::Stale);
        }

        log_transition(
            giveaway.id,
            Transition::Close.from_status(),
            Transition::Close.to_status(),
            None,
        );
        self.deps
            .actions
            .log(
                Transition::Close.action(),
                None,
                Some(giveaway.id),
                "Applications closed",
            )
            .await;

        Ok(ItemOutcome::Applied)
    }
}

#[async_trait]
impl Task for CloseTask {
    fn name(&self) -> &'static str {
        "close"
    }

    async fn run(&self, now: DateTime<Utc>, shutdown: &ShutdownSignal) -> Result<TaskReport, StoreError> {
        let due = self.deps.store.list_due_for_close(now).await?;
        let mut report = TaskReport::default();

        for giveaway in &due {
            if shutdown.is_shutdown() {
                break;
            }
            match self.close_one(giveaway, now).await {
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
