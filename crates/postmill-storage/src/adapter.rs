// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`QueueStore`] port.

use async_trait::async_trait;
use tracing::debug;

use postmill_config::model::StorageConfig;
use postmill_core::{
    HealthStatus, LogEntry, PostmillError, QueueItem, QueueStatus, QueueStore,
    ScheduleSettings, StoredLogEntry,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed queue, log, and settings store.
///
/// Cheap to clone; clones share the same background connection.
#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open the database described by `config`.
    pub async fn open(config: &StorageConfig) -> Result<Self, PostmillError> {
        let db = Database::open_with(&config.database_path, config.wal_mode).await?;
        debug!(path = %config.database_path, "SQLite store initialized");
        Ok(Self { db })
    }

    /// Wrap an already-open database.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoint the WAL before process exit.
    pub async fn close(&self) -> Result<(), PostmillError> {
        self.db.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl QueueStore for SqliteStore {
    async fn dequeue_next(&self) -> Result<Option<QueueItem>, PostmillError> {
        queries::queue::dequeue_next(&self.db).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<(), PostmillError> {
        queries::queue::update_status(&self.db, id, status, touch_processed_at).await
    }

    async fn transition_status(
        &self,
        id: &str,
        from: &[QueueStatus],
        to: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<Option<QueueItem>, PostmillError> {
        queries::queue::transition_status(&self.db, id, from, to, touch_processed_at).await
    }

    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>, PostmillError> {
        queries::queue::get_item(&self.db, id).await
    }

    async fn list_items(&self) -> Result<Vec<QueueItem>, PostmillError> {
        queries::queue::list_items(&self.db).await
    }

    async fn count_pending(&self) -> Result<u64, PostmillError> {
        queries::queue::count_pending(&self.db).await
    }

    async fn insert_item(
        &self,
        topic: &str,
        focus_keyphrase: Option<&str>,
        keywords: Option<&[String]>,
    ) -> Result<QueueItem, PostmillError> {
        queries::queue::insert_item(&self.db, topic, focus_keyphrase, keywords).await
    }

    async fn reset_in_progress(&self) -> Result<u64, PostmillError> {
        queries::queue::reset_in_progress(&self.db).await
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PostmillError> {
        queries::logs::append_log(&self.db, entry).await
    }

    async fn recent_logs(&self, limit: u32) -> Result<Vec<StoredLogEntry>, PostmillError> {
        queries::logs::recent_logs(&self.db, limit).await
    }

    async fn read_schedule_settings(&self) -> Result<ScheduleSettings, PostmillError> {
        queries::settings::read_schedule_settings(&self.db).await
    }

    async fn write_schedule_settings(
        &self,
        settings: &ScheduleSettings,
    ) -> Result<(), PostmillError> {
        queries::settings::write_schedule_settings(&self.db, settings).await
    }

    async fn health_check(&self) -> Result<HealthStatus, PostmillError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}
