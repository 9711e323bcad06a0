// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot CLI commands that run against the configured store and providers.

use std::io::Write;

use chrono::Utc;
use postmill_config::PostmillConfig;
use postmill_core::{PostmillError, QueueStore, ScheduleSettings};
use postmill_cron::{SchedulePlan, validate_schedule};
use postmill_pipeline::{discard_item, requeue_item};
use serde::Serialize;

use crate::app::{App, open_store};

fn print_json<T: Serialize>(value: &T) -> Result<(), PostmillError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| PostmillError::Internal(format!("failed to encode output: {e}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")
        .map_err(|e| PostmillError::Internal(format!("failed to write output: {e}")))
}

/// Run a single pipeline iteration and print its result.
pub async fn run_once(config: &PostmillConfig) -> Result<(), PostmillError> {
    let app = App::build(config).await?;
    let result = app.workers.run_pipeline().await?;
    print_json(&result)?;
    app.shutdown().await
}

/// Generate new topics and print how many were queued.
pub async fn replenish(config: &PostmillConfig) -> Result<(), PostmillError> {
    let app = App::build(config).await?;
    let outcome = app.workers.run_replenish().await?;
    print_json(&outcome)?;
    app.shutdown().await
}

/// Print every queue item, newest first.
pub async fn queue_list(config: &PostmillConfig) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let items = store.list_items().await?;
    print_json(&items)?;
    store.close().await
}

/// Add a topic to the queue by hand.
pub async fn queue_add(
    config: &PostmillConfig,
    topic: &str,
    keyphrase: Option<&str>,
    keywords: &[String],
) -> Result<(), PostmillError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(PostmillError::Config("topic must not be empty".into()));
    }
    let keywords = (!keywords.is_empty()).then_some(keywords);
    let store = open_store(config).await?;
    let item = store.insert_item(topic, keyphrase, keywords).await?;
    print_json(&item)?;
    store.close().await
}

/// Put a held or discarded item back in line.
pub async fn queue_requeue(config: &PostmillConfig, id: &str) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let result = requeue_item(store.as_ref(), id).await;
    store.close().await?;
    print_json(&result?)
}

/// Drop a pending or held item from the queue for good.
pub async fn queue_discard(config: &PostmillConfig, id: &str) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let result = discard_item(store.as_ref(), id).await;
    store.close().await?;
    print_json(&result?)
}

/// Print the most recent audit log entries.
pub async fn logs(config: &PostmillConfig, limit: u32) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let entries = store.recent_logs(limit).await?;
    print_json(&entries)?;
    store.close().await
}

#[derive(Serialize)]
struct ScheduleView {
    #[serde(flatten)]
    settings: ScheduleSettings,
    jobs: Vec<postmill_cron::JobInfo>,
}

/// Print the persisted schedule and the jobs it expands to.
pub async fn schedule_show(config: &PostmillConfig) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let settings = store.read_schedule_settings().await?;
    let jobs = match SchedulePlan::from_settings(&settings) {
        Ok(plan) => plan.job_infos(Utc::now()),
        Err(e) => {
            tracing::warn!(error = %e, "persisted schedule is invalid, the scheduler will use the fallback");
            Vec::new()
        }
    };
    print_json(&ScheduleView { settings, jobs })?;
    store.close().await
}

/// Persist a new schedule. A running server picks it up on its next reload.
pub async fn schedule_set(
    config: &PostmillConfig,
    times: Vec<String>,
    timezone: Option<String>,
    active: Option<bool>,
) -> Result<(), PostmillError> {
    let store = open_store(config).await?;
    let current = store.read_schedule_settings().await?;
    let settings = ScheduleSettings {
        active: active.unwrap_or(current.active),
        run_times: if times.is_empty() {
            current.run_times
        } else {
            times
        },
        timezone: timezone.unwrap_or(current.timezone),
    };
    validate_schedule(&settings)?;
    store.write_schedule_settings(&settings).await?;
    print_json(&settings)?;
    eprintln!("schedule saved; POST /reload-schedule to apply it to a running server");
    store.close().await
}
