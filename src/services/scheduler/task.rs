use crate::giveaways::{ActionLog, GiveawayStore, MessagingGateway, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;

/// Collaborators shared by the lifecycle tasks
#[derive(Clone)]
pub struct TaskDeps {
    pub store: Arc<dyn GiveawayStore>,
    pub gateway: Arc<dyn MessagingGateway>,
    pub actions: Arc<dyn ActionLog>,
}

impl TaskDeps {
    pub fn new(
        store: Arc<dyn GiveawayStore>,
        gateway: Arc<dyn MessagingGateway>,
        actions: Arc<dyn ActionLog>,
    ) -> Self {
        Self {
            store,
            gateway,
            actions,
        }
    }
}

/// Read side of the scheduler's stop request.
///
/// Tasks check it between giveaways, never inside one, so a stop never
/// splits a side effect from its status write.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// A sender to request shutdown and the matching signal
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Per-task counters of one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    /// Transitions written
    pub processed: usize,
    /// Items another writer had already moved on
    pub skipped: usize,
    /// Items left for the next tick after an error
    pub failed: usize,
}

/// Outcome of one giveaway inside a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Applied,
    Stale,
}

impl TaskReport {
    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Applied => self.processed += 1,
            ItemOutcome::Stale => self.skipped += 1,
        }
    }
}

/// One lifecycle-advancing step run on every tick
#[async_trait]
pub trait Task: Send + Sync {
    fn name(&self) -> &'static str;

    /// Processes the due batch. Per-item failures are counted in the
    /// report; only a failure to load the batch is returned.
    async fn run(&self, now: DateTime<Utc>, shutdown: &ShutdownSignal) -> Result<TaskReport, StoreError>;
}
