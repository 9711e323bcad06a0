// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator review of held queue items.

use postmill_core::{PostmillError, QueueItem, QueueStatus, QueueStore};
use tracing::info;

/// Statuses an item may be requeued from.
pub const REQUEUE_FROM: &[QueueStatus] = &[QueueStatus::Held, QueueStatus::Discarded];

/// Statuses an item may be discarded from. `in_progress` is excluded so a
/// running pipeline never loses its claim.
pub const DISCARD_FROM: &[QueueStatus] = &[QueueStatus::Pending, QueueStatus::Held];

/// Puts a held or discarded item back to `pending`. It keeps its original
/// `created_at`, so it is claimed ahead of newer topics.
pub async fn requeue_item(store: &dyn QueueStore, id: &str) -> Result<QueueItem, PostmillError> {
    let item = transition(store, id, REQUEUE_FROM, QueueStatus::Pending, false).await?;
    info!(queue_id = %item.id, topic = %item.topic, "item requeued");
    Ok(item)
}

/// Marks a pending or held item `discarded` and stamps `processed_at`.
pub async fn discard_item(store: &dyn QueueStore, id: &str) -> Result<QueueItem, PostmillError> {
    let item = transition(store, id, DISCARD_FROM, QueueStatus::Discarded, true).await?;
    info!(queue_id = %item.id, topic = %item.topic, "item discarded");
    Ok(item)
}

async fn transition(
    store: &dyn QueueStore,
    id: &str,
    from: &[QueueStatus],
    to: QueueStatus,
    touch_processed_at: bool,
) -> Result<QueueItem, PostmillError> {
    if let Some(item) = store
        .transition_status(id, from, to, touch_processed_at)
        .await?
    {
        return Ok(item);
    }
    match store.get_item(id).await? {
        Some(current) => Err(PostmillError::InvalidTransition {
            id: id.to_string(),
            from: current.status,
            to,
        }),
        None => Err(PostmillError::ItemNotFound(id.to_string())),
    }
}
