// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline tests.
//!
//! `TestHarness` wires a [`MemoryStore`] and [`FakeServices`] into a real
//! [`Pipeline`]. Retries back off by one millisecond so failing stages do
//! not slow tests down.

use std::sync::Arc;
use std::time::Duration;

use postmill_core::{QueueItem, QueueStatus, QueueStore};
use postmill_pipeline::{Pipeline, PipelinePorts, PipelineResult, PipelineSettings};
use postmill_resilience::RetryPolicy;

use crate::fakes::FakeServices;
use crate::memory_store::MemoryStore;

pub struct TestHarnessBuilder {
    settings: PipelineSettings,
    queued: Vec<String>,
    confidence: Option<u32>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            settings: PipelineSettings {
                retry: RetryPolicy::new(2, Duration::from_millis(1)),
                ..PipelineSettings::default()
            },
            queued: Vec::new(),
            confidence: None,
        }
    }

    /// Queue these topics as `pending`, oldest first.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.queued.extend(topics.into_iter().map(Into::into));
        self
    }

    pub fn with_confidence(mut self, score: u32) -> Self {
        self.confidence = Some(score);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Never trigger background replenishment from a run.
    pub fn without_replenish(mut self) -> Self {
        self.settings.replenish_threshold = 0;
        self
    }

    pub async fn build(self) -> TestHarness {
        let store = Arc::new(MemoryStore::new());
        for topic in &self.queued {
            store.seed(topic, QueueStatus::Pending).await;
        }

        let fakes = Arc::new(FakeServices::new());
        if let Some(score) = self.confidence {
            fakes.set_confidence(score).await;
        }

        let ports = PipelinePorts {
            store: store.clone(),
            topics: fakes.clone(),
            drafts: fakes.clone(),
            reviser: fakes.clone(),
            covers: fakes.clone(),
            publisher: fakes.clone(),
        };
        let pipeline = Arc::new(Pipeline::new(ports, self.settings));

        TestHarness {
            store,
            fakes,
            pipeline,
        }
    }
}

pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub fakes: Arc<FakeServices>,
    pub pipeline: Arc<Pipeline>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn run(&self) -> PipelineResult {
        self.pipeline.run_pipeline().await
    }

    /// Wait for every detached side task spawned so far.
    pub async fn settle(&self) {
        let tracker = self.pipeline.side_tasks();
        tracker.close();
        tracker.wait().await;
        tracker.reopen();
    }

    pub async fn item_by_topic(&self, topic: &str) -> Option<QueueItem> {
        self.store
            .list_items()
            .await
            .ok()?
            .into_iter()
            .find(|i| i.topic == topic)
    }
}
