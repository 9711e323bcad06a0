// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable queue, audit log, and schedule settings store.

use async_trait::async_trait;

use crate::error::PostmillError;
use crate::types::{
    HealthStatus, LogEntry, QueueItem, QueueStatus, ScheduleSettings, StoredLogEntry,
};

/// Persistence contract consumed by the orchestrator, the replenisher, and
/// the scheduler.
///
/// All mutations are single-row updates guarded by a status predicate where
/// it matters; no operation spans more than one statement's worth of rows
/// except [`reset_in_progress`](QueueStore::reset_in_progress).
#[async_trait]
pub trait QueueStore: Send + Sync + 'static {
    /// Atomically claims the oldest `pending` item and marks it `in_progress`.
    ///
    /// Two concurrent callers never receive the same item.
    async fn dequeue_next(&self) -> Result<Option<QueueItem>, PostmillError>;

    /// Sets an item's status, optionally stamping `processed_at` with now.
    async fn update_status(
        &self,
        id: &str,
        status: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<(), PostmillError>;

    /// Moves an item to `to` only when its current status is one of `from`,
    /// in a single guarded update.
    ///
    /// Returns the updated item, or `None` when no item with `id` is in an
    /// allowed status (including when it does not exist).
    async fn transition_status(
        &self,
        id: &str,
        from: &[QueueStatus],
        to: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<Option<QueueItem>, PostmillError>;

    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>, PostmillError>;

    /// All items, newest first.
    async fn list_items(&self) -> Result<Vec<QueueItem>, PostmillError>;

    async fn count_pending(&self) -> Result<u64, PostmillError>;

    /// Inserts a new `pending` item.
    async fn insert_item(
        &self,
        topic: &str,
        focus_keyphrase: Option<&str>,
        keywords: Option<&[String]>,
    ) -> Result<QueueItem, PostmillError>;

    /// Returns every `in_progress` item to `pending`. Returns the number reset.
    async fn reset_in_progress(&self) -> Result<u64, PostmillError>;

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PostmillError>;

    /// Most recent log entries, newest first.
    async fn recent_logs(&self, limit: u32) -> Result<Vec<StoredLogEntry>, PostmillError>;

    async fn read_schedule_settings(&self) -> Result<ScheduleSettings, PostmillError>;

    async fn write_schedule_settings(
        &self,
        settings: &ScheduleSettings,
    ) -> Result<(), PostmillError>;

    async fn health_check(&self) -> Result<HealthStatus, PostmillError>;
}
