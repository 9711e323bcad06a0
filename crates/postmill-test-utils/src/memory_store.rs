// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `QueueStore` with failure injection.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use postmill_core::{
    HealthStatus, LogEntry, PostmillError, QueueItem, QueueStatus, QueueStore, ScheduleSettings,
    StoredLogEntry,
};
use tokio::sync::Mutex;

/// Store operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Dequeue,
    UpdateStatus,
    TransitionStatus,
    GetItem,
    ListItems,
    CountPending,
    InsertItem,
    ResetInProgress,
    AppendLog,
    RecentLogs,
    ReadSettings,
    WriteSettings,
    Health,
}

#[derive(Default)]
struct State {
    items: Vec<QueueItem>,
    logs: Vec<StoredLogEntry>,
    settings: Option<ScheduleSettings>,
    failing: HashSet<StoreOp>,
}

/// Keeps items in insertion order, so FIFO claiming is the first `pending`.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `op` fail with a storage error.
    pub async fn fail(&self, op: StoreOp) {
        self.state.lock().await.failing.insert(op);
    }

    pub async fn heal(&self, op: StoreOp) {
        self.state.lock().await.failing.remove(&op);
    }

    /// Insert an item with an explicit status, bypassing failure injection.
    pub async fn seed(&self, topic: &str, status: QueueStatus) -> QueueItem {
        let item = QueueItem {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            focus_keyphrase: None,
            keywords: None,
            status,
            created_at: now(),
            processed_at: None,
        };
        self.state.lock().await.items.push(item.clone());
        item
    }

    pub async fn items(&self) -> Vec<QueueItem> {
        self.state.lock().await.items.clone()
    }

    pub async fn item(&self, id: &str) -> Option<QueueItem> {
        self.state
            .lock()
            .await
            .items
            .iter()
            .find(|i| i.id == id)
            .cloned()
    }

    /// Log entries in append order.
    pub async fn logs(&self) -> Vec<LogEntry> {
        self.state
            .lock()
            .await
            .logs
            .iter()
            .map(|l| l.entry.clone())
            .collect()
    }

    pub async fn count_with_status(&self, status: QueueStatus) -> usize {
        self.state
            .lock()
            .await
            .items
            .iter()
            .filter(|i| i.status == status)
            .count()
    }

    async fn check(&self, op: StoreOp) -> Result<(), PostmillError> {
        if self.state.lock().await.failing.contains(&op) {
            return Err(PostmillError::storage(format!("injected {op:?} failure")));
        }
        Ok(())
    }
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn dequeue_next(&self) -> Result<Option<QueueItem>, PostmillError> {
        self.check(StoreOp::Dequeue).await?;
        let mut state = self.state.lock().await;
        Ok(state
            .items
            .iter_mut()
            .find(|i| i.status == QueueStatus::Pending)
            .map(|item| {
                item.status = QueueStatus::InProgress;
                item.clone()
            }))
    }

    async fn update_status(
        &self,
        id: &str,
        status: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<(), PostmillError> {
        self.check(StoreOp::UpdateStatus).await?;
        let mut state = self.state.lock().await;
        let item = state
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| PostmillError::storage(format!("queue item {id} not found")))?;
        item.status = status;
        if touch_processed_at {
            item.processed_at = Some(now());
        }
        Ok(())
    }

    async fn transition_status(
        &self,
        id: &str,
        from: &[QueueStatus],
        to: QueueStatus,
        touch_processed_at: bool,
    ) -> Result<Option<QueueItem>, PostmillError> {
        self.check(StoreOp::TransitionStatus).await?;
        let mut state = self.state.lock().await;
        Ok(state
            .items
            .iter_mut()
            .find(|i| i.id == id && from.contains(&i.status))
            .map(|item| {
                item.status = to;
                if touch_processed_at {
                    item.processed_at = Some(now());
                }
                item.clone()
            }))
    }

    async fn get_item(&self, id: &str) -> Result<Option<QueueItem>, PostmillError> {
        self.check(StoreOp::GetItem).await?;
        Ok(self.item(id).await)
    }

    async fn list_items(&self) -> Result<Vec<QueueItem>, PostmillError> {
        self.check(StoreOp::ListItems).await?;
        let mut items = self.items().await;
        items.reverse();
        Ok(items)
    }

    async fn count_pending(&self) -> Result<u64, PostmillError> {
        self.check(StoreOp::CountPending).await?;
        Ok(self.count_with_status(QueueStatus::Pending).await as u64)
    }

    async fn insert_item(
        &self,
        topic: &str,
        focus_keyphrase: Option<&str>,
        keywords: Option<&[String]>,
    ) -> Result<QueueItem, PostmillError> {
        self.check(StoreOp::InsertItem).await?;
        let item = QueueItem {
            id: uuid::Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            focus_keyphrase: focus_keyphrase.map(str::to_string),
            keywords: keywords.map(<[String]>::to_vec),
            status: QueueStatus::Pending,
            created_at: now(),
            processed_at: None,
        };
        self.state.lock().await.items.push(item.clone());
        Ok(item)
    }

    async fn reset_in_progress(&self) -> Result<u64, PostmillError> {
        self.check(StoreOp::ResetInProgress).await?;
        let mut state = self.state.lock().await;
        let mut reset = 0;
        for item in state
            .items
            .iter_mut()
            .filter(|i| i.status == QueueStatus::InProgress)
        {
            item.status = QueueStatus::Pending;
            reset += 1;
        }
        Ok(reset)
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<(), PostmillError> {
        self.check(StoreOp::AppendLog).await?;
        self.state.lock().await.logs.push(StoredLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now(),
            entry: entry.clone(),
        });
        Ok(())
    }

    async fn recent_logs(&self, limit: u32) -> Result<Vec<StoredLogEntry>, PostmillError> {
        self.check(StoreOp::RecentLogs).await?;
        let state = self.state.lock().await;
        Ok(state
            .logs
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn read_schedule_settings(&self) -> Result<ScheduleSettings, PostmillError> {
        self.check(StoreOp::ReadSettings).await?;
        Ok(self
            .state
            .lock()
            .await
            .settings
            .clone()
            .unwrap_or_default())
    }

    async fn write_schedule_settings(
        &self,
        settings: &ScheduleSettings,
    ) -> Result<(), PostmillError> {
        self.check(StoreOp::WriteSettings).await?;
        self.state.lock().await.settings = Some(settings.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, PostmillError> {
        self.check(StoreOp::Health).await?;
        Ok(HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn claims_in_insertion_order() {
        let store = MemoryStore::new();
        let first = store.insert_item("first", None, None).await.unwrap();
        store.insert_item("second", None, None).await.unwrap();

        let claimed = store.dequeue_next().await.unwrap().unwrap();
        assert_eq!(claimed.id, first.id);
        assert_eq!(claimed.status, QueueStatus::InProgress);
        assert_eq!(store.count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn transition_respects_current_status() {
        let store = MemoryStore::new();
        let held = store.seed("held", QueueStatus::Held).await;
        let live = store.seed("live", QueueStatus::InProgress).await;

        let moved = store
            .transition_status(&held.id, &[QueueStatus::Held], QueueStatus::Pending, false)
            .await
            .unwrap();
        assert_eq!(moved.unwrap().status, QueueStatus::Pending);

        let refused = store
            .transition_status(&live.id, &[QueueStatus::Held], QueueStatus::Pending, false)
            .await
            .unwrap();
        assert!(refused.is_none());
        assert_eq!(
            store.item(&live.id).await.unwrap().status,
            QueueStatus::InProgress
        );
    }

    #[tokio::test]
    async fn injected_failure_until_healed() {
        let store = MemoryStore::new();
        store.fail(StoreOp::AppendLog).await;
        let entry = LogEntry::error("q", "boom");
        assert!(store.append_log(&entry).await.is_err());

        store.heal(StoreOp::AppendLog).await;
        store.append_log(&entry).await.unwrap();
        assert_eq!(store.logs().await.len(), 1);
    }
}
