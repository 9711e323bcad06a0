// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The scheduler loop.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use postmill_core::QueueStore;
use postmill_pipeline::PipelineWorkers;
use tokio::sync::{Notify, RwLock};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info, warn};

use crate::plan::{JobInfo, SchedulePlan};

/// How long to idle when no job is scheduled before checking again.
const IDLE_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

pub struct Scheduler {
    workers: PipelineWorkers,
    plan: RwLock<SchedulePlan>,
    reloaded: Notify,
    runs: TaskTracker,
}

impl Scheduler {
    /// Load the persisted schedule, falling back when it is unusable.
    pub async fn new(workers: PipelineWorkers) -> Self {
        let plan = load_plan(workers.pipeline().store().as_ref()).await;
        Self {
            workers,
            plan: RwLock::new(plan),
            reloaded: Notify::new(),
            runs: TaskTracker::new(),
        }
    }

    /// Re-read settings, replace every job, and wake the loop.
    pub async fn reload(&self) -> Vec<JobInfo> {
        let plan = load_plan(self.workers.pipeline().store().as_ref()).await;
        let jobs = plan.job_infos(Utc::now());
        *self.plan.write().await = plan;
        self.reloaded.notify_one();
        jobs
    }

    pub async fn jobs(&self) -> Vec<JobInfo> {
        self.plan.read().await.job_infos(Utc::now())
    }

    /// Fire jobs at their wall-clock times until `cancel` is triggered, then
    /// wait for runs already in flight.
    pub async fn run(self: Arc<Self>, cancel: CancellationToken) {
        let job_count = self.plan.read().await.jobs().len();
        info!(jobs = job_count, "scheduler started");
        let mut last_fire: Option<DateTime<Utc>> = None;

        loop {
            let now = Utc::now();
            let after = last_fire.map_or(now, |fired| fired.max(now));
            let due = self.plan.read().await.next_due(after);
            let wait = due
                .as_ref()
                .map(|(at, _)| (*at - now).to_std().unwrap_or(Duration::ZERO))
                .unwrap_or(IDLE_WAIT);

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = self.reloaded.notified() => {
                    info!("schedule reloaded");
                    last_fire = None;
                }
                _ = tokio::time::sleep(wait) => {
                    let Some((at, job_ids)) = due else { continue };
                    last_fire = Some(at);
                    for job_id in job_ids {
                        let this = Arc::clone(&self);
                        self.runs.spawn(async move { this.fire(&job_id).await });
                    }
                }
            }
        }

        self.runs.close();
        self.runs.wait().await;
        info!("scheduler stopped");
    }

    async fn fire(&self, job_id: &str) {
        let store = self.workers.pipeline().store();
        match store.read_schedule_settings().await {
            Ok(settings) if !settings.active => {
                info!(job_id, "scheduler paused, skipping run");
                return;
            }
            Ok(_) => {}
            Err(err) => {
                error!(job_id, error = %err, "could not read schedule settings, skipping run");
                return;
            }
        }

        info!(job_id, "firing pipeline job");
        match self.workers.run_pipeline().await {
            Ok(result) => {
                info!(job_id, status = %result.status(), "scheduled run done");
                if let Some(detail) = result.error_message() {
                    error!(job_id, error = detail, "scheduled run error detail");
                }
            }
            Err(err) => error!(job_id, error = %err, "scheduled pipeline run failed"),
        }
    }
}

async fn load_plan(store: &dyn QueueStore) -> SchedulePlan {
    let settings = match store.read_schedule_settings().await {
        Ok(settings) => settings,
        Err(err) => {
            error!(error = %err, "failed to load schedule, using fallback");
            return SchedulePlan::fallback();
        }
    };
    match SchedulePlan::from_settings(&settings) {
        Ok(plan) => {
            for job in plan.jobs() {
                info!(job_id = job.id(), timezone = %plan.timezone(), "scheduled pipeline");
            }
            if plan.jobs().is_empty() {
                warn!("schedule has no run times");
            }
            plan
        }
        Err(err) => {
            error!(error = %err, "failed to load schedule, using fallback");
            SchedulePlan::fallback()
        }
    }
}
