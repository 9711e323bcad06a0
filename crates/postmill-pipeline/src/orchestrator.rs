// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pipeline orchestrator.
//!
//! One call to [`Pipeline::run_pipeline`] handles exactly one queue item:
//!
//! 1. spawn a detached replenish when fewer than `replenish_threshold`
//!    items are pending
//! 2. sweep orphaned `in_progress` items back to `pending`
//! 3. claim the oldest `pending` item
//! 4. draft, then revise (each retried)
//! 5. hold the item when the confidence score is below `draft_threshold`
//! 6. produce a cover image (retried) and check the assembled payload
//! 7. create the post (retried), public when the score reaches
//!    `auto_publish_threshold`, otherwise as an unpublished draft
//!
//! Any failure from step 4 onward returns the item to `pending` and writes
//! an `error` log entry.

use std::sync::Arc;
use std::time::Duration;

use postmill_config::PostmillConfig;
use postmill_core::{
    CoverImageProducer, DraftReviser, DraftWriter, LogEntry, LogStatus, NewPost, PostPublisher,
    PostmillError, QueueItem, QueueStatus, QueueStore, TopicSource,
};
use postmill_resilience::{RetryPolicy, with_retry};
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

use crate::payload::validate_payload;
use crate::replenish::{ReplenishOutcome, Replenisher};
use crate::result::{NO_PENDING_TOPICS, PipelineResult, PublishOutcome};

/// Every collaborator the orchestrator calls.
#[derive(Clone)]
pub struct PipelinePorts {
    pub store: Arc<dyn QueueStore>,
    pub topics: Arc<dyn TopicSource>,
    pub drafts: Arc<dyn DraftWriter>,
    pub reviser: Arc<dyn DraftReviser>,
    pub covers: Arc<dyn CoverImageProducer>,
    pub publisher: Arc<dyn PostPublisher>,
}

/// Thresholds and limits for a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    /// Scores below this are held.
    pub draft_threshold: u32,
    /// Scores at or above this are published publicly.
    pub auto_publish_threshold: u32,
    /// Replenish when fewer than this many items are pending.
    pub replenish_threshold: u64,
    pub replenish_count: usize,
    pub author: String,
    pub retry: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            draft_threshold: 70,
            auto_publish_threshold: 85,
            replenish_threshold: 6,
            replenish_count: 15,
            author: "Jesse A. Eisenbalm".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineSettings {
    pub fn from_config(config: &PostmillConfig) -> Self {
        Self {
            draft_threshold: config.pipeline.draft_threshold,
            auto_publish_threshold: config.pipeline.auto_publish_threshold,
            replenish_threshold: config.pipeline.replenish_threshold,
            replenish_count: config.pipeline.replenish_count,
            author: config.brand.author.clone(),
            retry: RetryPolicy::new(
                config.pipeline.max_retries,
                Duration::from_millis(config.pipeline.retry_base_delay_ms),
            ),
        }
    }
}

pub struct Pipeline {
    ports: PipelinePorts,
    settings: PipelineSettings,
    replenisher: Arc<Replenisher>,
    side_tasks: TaskTracker,
}

impl Pipeline {
    pub fn new(ports: PipelinePorts, settings: PipelineSettings) -> Self {
        let replenisher = Arc::new(Replenisher::new(
            Arc::clone(&ports.store),
            Arc::clone(&ports.topics),
            settings.replenish_count,
        ));
        Self {
            ports,
            settings,
            replenisher,
            side_tasks: TaskTracker::new(),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<dyn QueueStore> {
        &self.ports.store
    }

    /// Tracker for detached replenish tasks. Close and wait on it to drain
    /// them at shutdown.
    pub fn side_tasks(&self) -> &TaskTracker {
        &self.side_tasks
    }

    pub async fn run_replenish(&self) -> Result<ReplenishOutcome, PostmillError> {
        self.replenisher.run_replenish().await
    }

    /// Process one queue item end to end. Never fails; see [`PipelineResult`].
    pub async fn run_pipeline(&self) -> PipelineResult {
        self.trigger_replenish_if_low().await;

        let store = &self.ports.store;
        match store.reset_in_progress().await {
            Ok(0) => {}
            Ok(reset) => warn!(reset, "returned orphaned in-progress items to pending"),
            Err(err) => {
                error!(error = %err, "crash recovery sweep failed");
                return PipelineResult::error(None, err.to_string());
            }
        }

        let item = match store.dequeue_next().await {
            Ok(Some(item)) => item,
            Ok(None) => {
                info!("no pending topics in queue");
                return PipelineResult::error(None, NO_PENDING_TOPICS);
            }
            Err(err) => {
                error!(error = %err, "dequeue failed");
                return PipelineResult::error(None, err.to_string());
            }
        };

        info!(item_id = %item.id, topic = %item.topic, "pipeline run started");
        match self.process(&item).await {
            Ok(result) => {
                info!(item_id = %item.id, status = %result.status(), "pipeline run finished");
                result
            }
            Err(err) => self.fail(&item, err).await,
        }
    }

    async fn trigger_replenish_if_low(&self) {
        match self.ports.store.count_pending().await {
            Ok(pending) if pending < self.settings.replenish_threshold => {
                info!(
                    pending,
                    threshold = self.settings.replenish_threshold,
                    "queue low, replenishing in background"
                );
                self.replenisher.spawn_detached(&self.side_tasks);
            }
            Ok(pending) => debug!(pending, "queue depth ok"),
            Err(err) => warn!(error = %err, "could not count pending items"),
        }
    }

    async fn process(&self, item: &QueueItem) -> Result<PipelineResult, PostmillError> {
        let ports = &self.ports;
        let retry = self.settings.retry;
        let keyphrase = item.resolved_keyphrase();

        let topic = item.topic.as_str();
        let draft = with_retry(retry, "content agent", move || {
            ports.drafts.write_draft(topic, keyphrase)
        })
        .await?;
        debug!(item_id = %item.id, title = %draft.title, "draft written");

        let draft = &draft;
        let revision = with_retry(retry, "revision agent", move || ports.reviser.revise(draft)).await?;
        info!(
            item_id = %item.id,
            confidence_score = revision.confidence_score,
            seo_checks_passed = revision.seo_checks_passed,
            "draft revised"
        );

        if revision.confidence_score < self.settings.draft_threshold {
            ports
                .store
                .update_status(&item.id, QueueStatus::Held, true)
                .await?;
            if let Err(err) = ports.store.append_log(&LogEntry::held(&item.id, &revision)).await {
                warn!(item_id = %item.id, error = %err, "failed to write held log entry");
            }
            return Ok(PipelineResult::held(&item.topic, &revision));
        }

        let (title, excerpt) = (revision.title.as_str(), revision.excerpt.as_str());
        let cover_image = with_retry(retry, "image agent", move || {
            ports.covers.produce_cover(title, excerpt)
        })
        .await?;

        validate_payload(&revision, &cover_image)?;

        let published = revision.confidence_score >= self.settings.auto_publish_threshold;
        let new_post = NewPost {
            title: revision.title.clone(),
            excerpt: revision.excerpt.clone(),
            content: revision.content.clone(),
            author: self.settings.author.clone(),
            cover_image,
            tags: revision.tags.clone(),
            published,
        };
        let new_post = &new_post;
        let post =
            with_retry(retry, "blog API", move || ports.publisher.create_post(new_post)).await?;

        // A failure here sends the item back to pending even though the post
        // exists, so the next run may publish the topic a second time.
        ports
            .store
            .update_status(&item.id, QueueStatus::Published, true)
            .await?;

        let status = if published {
            LogStatus::Success
        } else {
            LogStatus::Draft
        };
        if let Err(err) = ports
            .store
            .append_log(&LogEntry::published(&item.id, &post.id, status, &revision))
            .await
        {
            warn!(item_id = %item.id, post_id = %post.id, error = %err, "failed to write publish log entry");
        }

        let outcome = PublishOutcome {
            topic: item.topic.clone(),
            post_id: post.id,
            slug: post.slug,
            confidence_score: revision.confidence_score,
            seo_checks_passed: revision.seo_checks_passed,
            revision_notes: revision.revision_notes,
        };
        Ok(if published {
            PipelineResult::Success(outcome)
        } else {
            PipelineResult::Draft(outcome)
        })
    }

    async fn fail(&self, item: &QueueItem, err: PostmillError) -> PipelineResult {
        let message = err.to_string();
        error!(item_id = %item.id, topic = %item.topic, error = %message, "pipeline run failed");

        let store = &self.ports.store;
        if let Err(reset_err) = store
            .update_status(&item.id, QueueStatus::Pending, false)
            .await
        {
            error!(item_id = %item.id, error = %reset_err, "failed to return item to pending");
        }
        if let Err(log_err) = store.append_log(&LogEntry::error(&item.id, &message)).await {
            warn!(item_id = %item.id, error = %log_err, "failed to write error log entry");
        }

        PipelineResult::error(Some(&item.topic), message)
    }
}
