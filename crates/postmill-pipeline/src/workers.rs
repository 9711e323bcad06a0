// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded task pool for pipeline and replenish jobs.

use std::sync::Arc;

use postmill_core::PostmillError;
use tokio::sync::Semaphore;
use tracing::error;

use crate::orchestrator::Pipeline;
use crate::replenish::ReplenishOutcome;
use crate::result::PipelineResult;

/// Runs jobs on spawned tasks so callers such as HTTP handlers and the
/// scheduler stay responsive. At most `workers` jobs run at once.
///
/// The only error [`run_pipeline`](Self::run_pipeline) reports is a failure
/// to dispatch or join the task.
#[derive(Clone)]
pub struct PipelineWorkers {
    pipeline: Arc<Pipeline>,
    permits: Arc<Semaphore>,
}

impl PipelineWorkers {
    pub fn new(pipeline: Arc<Pipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }

    /// Permits not currently held by a running job.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn run_pipeline(&self) -> Result<PipelineResult, PostmillError> {
        let permit = self.acquire().await?;
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            let _permit = permit;
            pipeline.run_pipeline().await
        })
        .await
        .map_err(|e| {
            error!(error = %e, "pipeline task failed");
            PostmillError::Internal(format!("pipeline task failed: {e}"))
        })
    }

    pub async fn run_replenish(&self) -> Result<ReplenishOutcome, PostmillError> {
        let permit = self.acquire().await?;
        let pipeline = Arc::clone(&self.pipeline);
        tokio::spawn(async move {
            let _permit = permit;
            pipeline.run_replenish().await
        })
        .await
        .map_err(|e| {
            error!(error = %e, "replenish task failed");
            PostmillError::Internal(format!("replenish task failed: {e}"))
        })?
    }

    async fn acquire(&self) -> Result<tokio::sync::OwnedSemaphorePermit, PostmillError> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PostmillError::Internal("worker pool closed".into()))
    }
}
