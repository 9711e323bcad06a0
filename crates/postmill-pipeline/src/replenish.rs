// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue replenishment.

use std::sync::Arc;

use postmill_core::{PostmillError, QueueStore, TopicSource};
use serde::{Deserialize, Serialize};
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishOutcome {
    pub added: usize,
    pub message: String,
}

impl ReplenishOutcome {
    fn new(added: usize) -> Self {
        Self {
            added,
            message: format!("Added {added} topics to the queue"),
        }
    }
}

/// Asks the topic source for new ideas and appends them as `pending` items.
///
/// Existing items are only read, never changed. Calling twice adds twice;
/// the existing-topic list is a hint to the generator, not a uniqueness check.
pub struct Replenisher {
    store: Arc<dyn QueueStore>,
    topics: Arc<dyn TopicSource>,
    count: usize,
}

impl Replenisher {
    pub fn new(store: Arc<dyn QueueStore>, topics: Arc<dyn TopicSource>, count: usize) -> Self {
        Self {
            store,
            topics,
            count,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub async fn run_replenish(&self) -> Result<ReplenishOutcome, PostmillError> {
        let existing: Vec<String> = self
            .store
            .list_items()
            .await?
            .into_iter()
            .map(|item| item.topic)
            .collect();

        let suggestions = self.topics.suggest_topics(self.count, &existing).await?;
        for suggestion in &suggestions {
            self.store
                .insert_item(
                    &suggestion.topic,
                    Some(suggestion.focus_keyphrase.as_str()),
                    Some(suggestion.keywords.as_slice()),
                )
                .await?;
        }

        info!(
            added = suggestions.len(),
            existing = existing.len(),
            "queue replenished"
        );
        Ok(ReplenishOutcome::new(suggestions.len()))
    }

    /// Run on `tracker` without awaiting. Failures are logged and dropped.
    pub fn spawn_detached(self: &Arc<Self>, tracker: &TaskTracker) {
        let this = Arc::clone(self);
        tracker.spawn(async move {
            if let Err(err) = this.run_replenish().await {
                warn!(error = %err, "background replenish failed (non-fatal)");
            }
        });
    }
}
