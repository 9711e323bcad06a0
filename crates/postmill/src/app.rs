// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Constructs the runtime object graph from configuration.

use std::sync::Arc;

use postmill_blog::BlogClient;
use postmill_config::PostmillConfig;
use postmill_core::PostmillError;
use postmill_gemini::{CoverImageAgent, GeminiClient};
use postmill_openai::{ContentWriter, OpenAiClient, RevisionAgent, TopicAgent};
use postmill_pipeline::{Pipeline, PipelinePorts, PipelineSettings, PipelineWorkers};
use postmill_storage::SqliteStore;
use tracing::info;

/// Open the SQLite store and run migrations.
pub async fn open_store(config: &PostmillConfig) -> Result<Arc<SqliteStore>, PostmillError> {
    Ok(Arc::new(SqliteStore::open(&config.storage).await?))
}

/// Build every provider port and the orchestrator on top of `store`.
///
/// Fails when a required API key cannot be resolved.
pub fn build_pipeline(
    config: &PostmillConfig,
    store: Arc<SqliteStore>,
) -> Result<Arc<Pipeline>, PostmillError> {
    let text = OpenAiClient::from_config(config)?;
    let blog = Arc::new(BlogClient::from_config(config)?);
    let covers = CoverImageAgent::new(GeminiClient::from_config(config)?, blog.clone());

    info!(
        text_model = text.model(),
        image_model = %config.gemini.image_model,
        blog = %config.blog.api_url,
        "providers configured"
    );

    let ports = PipelinePorts {
        store,
        topics: Arc::new(TopicAgent::new(text.clone())),
        drafts: Arc::new(ContentWriter::new(text.clone())),
        reviser: Arc::new(RevisionAgent::new(text)),
        covers: Arc::new(covers),
        publisher: blog,
    };
    Ok(Arc::new(Pipeline::new(
        ports,
        PipelineSettings::from_config(config),
    )))
}

/// Everything needed to run pipelines.
pub struct App {
    pub store: Arc<SqliteStore>,
    pub pipeline: Arc<Pipeline>,
    pub workers: PipelineWorkers,
}

impl App {
    pub async fn build(config: &PostmillConfig) -> Result<Self, PostmillError> {
        let store = open_store(config).await?;
        let pipeline = build_pipeline(config, store.clone())?;
        let workers = PipelineWorkers::new(pipeline.clone(), config.pipeline.workers);
        Ok(Self {
            store,
            pipeline,
            workers,
        })
    }

    /// Drain detached tasks and checkpoint the WAL.
    pub async fn shutdown(&self) -> Result<(), PostmillError> {
        let side_tasks = self.pipeline.side_tasks();
        side_tasks.close();
        side_tasks.wait().await;
        self.store.close().await
    }
}
