use super::task::{ItemOutcome, ShutdownSignal, Task, TaskDeps, TaskReport};
use crate::giveaways::lifecycle::{self, Transition};
use crate::giveaways::{Giveaway, GiveawayResult, StoreError, Winner};
use crate::utils::logging::{
    log_side_effect_failure, log_transition, log_transition_failure, log_transition_stale,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;

/// `closed -> finished | cancelled`: draws the winner, stores the result
/// and announces it in the group
pub struct FinishTask {
    deps: TaskDeps,
}

impl FinishTask {
    pub fn new(deps: TaskDeps) -> Self {
        Self { deps }
    }

    async fn finish_one(&self, giveaway: &Giveaway, now: DateTime<Utc>) -> GiveawayResult<ItemOutcome> {
        let participants = self.deps.store.participants(giveaway.id).await?;
        let decision = lifecycle::finish(giveaway, &participants, &mut OsRng)?;

        if !self.deps.store.update(&decision.patch, now).await? {
            log_transition_stale(self.name(), giveaway.id, decision.patch.expected);
            return Ok(ItemOutcome::Stale);
        }

        let details = match &decision.winner {
            Some(winner) => format!(
                "winner {} out of {} participants",
                winner.user_id,
                participants.len()
            ),
            None => "no participants".to_string(),
        };
        log_transition(
            giveaway.id,
            decision.transition.from_status(),
            decision.transition.to_status(),
            Some(&details),
        );

        let audit_user = decision.winner.as_ref().map(|w| w.user_id);
        let description = match decision.transition {
            Transition::Finish => format!("Giveaway finished, {details}"),
            _ => "Giveaway cancelled, no participants".to_string(),
        };
        self.deps
            .actions
            .log(decision.transition.action(), audit_user, Some(giveaway.id), &description)
            .await;

        if decision.transition == Transition::Finish {
            let mut finished = giveaway.clone();
            decision.patch.apply_to(&mut finished);
            let winner = Winner {
                giveaway: finished,
                participant: decision.winner,
            };

            // Stored already; a lost announcement is not retried
            if let Err(e) = self.deps.gateway.notify_winner(&winner).await {
                log_side_effect_failure("notify winner", giveaway.id, &e.to_string());
            }
        }

        Ok(ItemOutcome::Applied)
    }
}

#[async_trait]
impl Task for FinishTask {
    fn name(&self) -> &'static str {
        "finish"
    }

    async fn run(&self, now: DateTime<Utc>, shutdown: &ShutdownSignal) -> Result<TaskReport, StoreError> {
        let due = self.deps.store.list_due_for_finish(now).await?;
        let mut report = TaskReport::default();

        for giveaway in &due {
            if shutdown.is_shutdown() {
                break;
            }
            match self.finish_one(giveaway, now).await {
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
