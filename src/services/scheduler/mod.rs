//! Periodic driver of the giveaway lifecycle.
//!
//! Every tick runs [`PublishTask`], [`CloseTask`] and [`FinishTask`] in that
//! order. Tasks process their batch one giveaway at a time and a failed
//! giveaway never stops the rest of the batch. Ticks never overlap: a tick
//! that fires while the previous one is still running is skipped.

pub mod close;
pub mod finish;
pub mod publish;
pub mod task;

pub use close::CloseTask;
pub use finish::FinishTask;
pub use publish::PublishTask;
pub use task::{ShutdownSignal, Task, TaskDeps, TaskReport};

use crate::utils::logging::{log_system_event, log_task_finished, log_timeout};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{watch, Mutex, RwLock};
use tokio_cron_scheduler::{Job, JobScheduler};

/// Result of one task inside a tick
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub task: &'static str,
    pub report: TaskReport,
    /// Set when the due batch could not be loaded
    pub error: Option<String>,
}

/// Result of one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub started_at: DateTime<Utc>,
    pub tasks: Vec<TaskSummary>,
    /// Shutdown was requested before every task ran
    pub interrupted: bool,
}

impl TickReport {
    pub fn task(&self, name: &str) -> Option<&TaskSummary> {
        self.tasks.iter().find(|summary| summary.task == name)
    }

    pub fn total_failed(&self) -> usize {
        self.tasks.iter().map(|summary| summary.report.failed).sum()
    }
}

/// What the health endpoint reports about the scheduler
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerStatus {
    pub last_tick_at: Option<DateTime<Utc>>,
    pub ticks_completed: u64,
    pub last_report: Option<TickReport>,
}

pub type SchedulerStatusHandle = Arc<RwLock<SchedulerStatus>>;

struct SchedulerCore {
    tasks: Vec<Box<dyn Task>>,
    tick_lock: Mutex<()>,
    status: SchedulerStatusHandle,
    shutdown: ShutdownSignal,
}

impl SchedulerCore {
    async fn run_tick(&self, now: DateTime<Utc>) -> Option<TickReport> {
        let Ok(_guard) = self.tick_lock.try_lock() else {
            tracing::warn!("Previous scheduler tick still running, skipping tick at {}", now);
            return None;
        };

        if self.shutdown.is_shutdown() {
            tracing::debug!("Scheduler is shutting down, skipping tick at {}", now);
            return None;
        }

        let mut report = TickReport {
            started_at: now,
            tasks: Vec::with_capacity(self.tasks.len()),
            interrupted: false,
        };

        for task in &self.tasks {
            if self.shutdown.is_shutdown() {
                report.interrupted = true;
                break;
            }

            let started = Instant::now();
            let summary = match task.run(now, &self.shutdown).await {
                Ok(task_report) => {
                    log_task_finished(
                        task.name(),
                        task_report.processed,
                        task_report.skipped,
                        task_report.failed,
                        started.elapsed(),
                    );
                    TaskSummary {
                        task: task.name(),
                        report: task_report,
                        error: None,
                    }
                }
                Err(e) => {
                    tracing::error!("TASK: {} could not load due giveaways - {}", task.name(), e);
                    TaskSummary {
                        task: task.name(),
                        report: TaskReport::default(),
                        error: Some(e.to_string()),
                    }
                }
            };
            report.tasks.push(summary);
        }

        let mut status = self.status.write().await;
        status.last_tick_at = Some(now);
        status.ticks_completed += 1;
        status.last_report = Some(report.clone());

        Some(report)
    }
}

pub struct SchedulerService {
    core: Arc<SchedulerCore>,
    shutdown_tx: watch::Sender<bool>,
    tick_interval: Duration,
    scheduler: Mutex<Option<JobScheduler>>,
}

impl SchedulerService {
    pub fn new(tasks: Vec<Box<dyn Task>>, tick_interval: Duration) -> Self {
        let (shutdown_tx, shutdown) = ShutdownSignal::channel();
        let core = SchedulerCore {
            tasks,
            tick_lock: Mutex::new(()),
            status: Arc::new(RwLock::new(SchedulerStatus::default())),
            shutdown,
        };

        Self {
            core: Arc::new(core),
            shutdown_tx,
            tick_interval,
            scheduler: Mutex::new(None),
        }
    }

    /// Publish, close and finish, in that order
    pub fn with_default_tasks(deps: TaskDeps, tick_interval: Duration) -> Self {
        let tasks: Vec<Box<dyn Task>> = vec![
            Box::new(PublishTask::new(deps.clone())),
            Box::new(CloseTask::new(deps.clone())),
            Box::new(FinishTask::new(deps)),
        ];
        Self::new(tasks, tick_interval)
    }

    pub fn status(&self) -> SchedulerStatusHandle {
        self.core.status.clone()
    }

    /// Runs a single tick at `now`. Returns `None` when the tick was
    /// skipped because another one is running or shutdown was requested.
    pub async fn run_tick(&self, now: DateTime<Utc>) -> Option<TickReport> {
        self.core.run_tick(now).await
    }

    pub async fn start(&self) -> Result<()> {
        let scheduler = JobScheduler::new().await?;
        let core = self.core.clone();

        let tick_job = Job::new_repeated_async(self.tick_interval, move |_uuid, _l| {
            let core = core.clone();
            Box::pin(async move {
                core.run_tick(Utc::now()).await;
            })
        })?;

        scheduler.add(tick_job).await?;
        scheduler.start().await?;
        *self.scheduler.lock().await = Some(scheduler);

        log_system_event(
            "Scheduler started",
            Some(&format!("ticking every {}s", self.tick_interval.as_secs())),
        );
        Ok(())
    }

    /// Stops ticking and waits up to `grace` for the running tick.
    ///
    /// Tasks stop before their next giveaway once shutdown is requested.
    pub async fn stop(&self, grace: Duration) -> Result<()> {
        self.shutdown_tx.send_replace(true);

        let job_scheduler = self.scheduler.lock().await.take();
        if let Some(mut scheduler) = job_scheduler {
            scheduler.shutdown().await?;
        }

        match tokio::time::timeout(grace, self.core.tick_lock.lock()).await {
            Ok(_guard) => log_system_event("Scheduler stopped", None),
            Err(_) => log_timeout(
                "scheduler stop",
                grace.as_secs(),
                Some("in-flight tick abandoned"),
            ),
        }

        Ok(())
    }
}
