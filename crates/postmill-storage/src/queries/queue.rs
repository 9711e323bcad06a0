// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic queue operations.

use std::str::FromStr;

use postmill_core::{PostmillError, QueueItem, QueueStatus};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};

const ITEM_COLUMNS: &str = "id, topic, focus_keyphrase, keywords, status, created_at, processed_at";

fn row_to_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<QueueItem> {
    let status: String = row.get(4)?;
    let status = QueueStatus::from_str(&status)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    let keywords: Option<String> = row.get(3)?;
    let keywords = keywords
        .map(|raw| serde_json::from_str::<Vec<String>>(&raw))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(QueueItem {
        id: row.get(0)?,
        topic: row.get(1)?,
        focus_keyphrase: row.get(2)?,
        keywords,
        status,
        created_at: row.get(5)?,
        processed_at: row.get(6)?,
    })
}

/// Claim the oldest pending item and mark it `in_progress` in one statement.
///
/// The `status = 'pending'` guard on the outer update means a row already
/// claimed by another caller is never returned twice.
pub async fn dequeue_next(db: &Database) -> Result<Option<QueueItem>, PostmillError> {
    let sql = format!(
        "UPDATE automation_queue SET status = 'in_progress'
         WHERE id = (
             SELECT id FROM automation_queue
             WHERE status = 'pending'
             ORDER BY created_at ASC, rowid ASC
             LIMIT 1
         ) AND status = 'pending'
         RETURNING {ITEM_COLUMNS}"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query_map([], row_to_item)?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

/// Set an item's status; when `touch_processed_at` is set, stamp `processed_at`.
pub async fn update_status(
    db: &Database,
    id: &str,
    status: QueueStatus,
    touch_processed_at: bool,
) -> Result<(), PostmillError> {
    let id = id.to_string();
    let status = status.to_string();
    let changed = db
        .connection()
        .call(move |conn| {
            let sql = if touch_processed_at {
                "UPDATE automation_queue SET status = ?1,
                 processed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2"
            } else {
                "UPDATE automation_queue SET status = ?1 WHERE id = ?2"
            };
            conn.execute(sql, params![status, id])
        })
        .await
        .map_err(map_tr_err)?;

    if changed == 0 {
        return Err(PostmillError::storage("queue item not found"));
    }
    Ok(())
}

/// Move an item to `to` if its status is currently one of `from`.
///
/// The status guard and the write are one statement, so an item claimed by
/// a pipeline run in between is left alone and `None` is returned.
pub async fn transition_status(
    db: &Database,
    id: &str,
    from: &[QueueStatus],
    to: QueueStatus,
    touch_processed_at: bool,
) -> Result<Option<QueueItem>, PostmillError> {
    if from.is_empty() {
        return Ok(None);
    }
    let placeholders = (0..from.len())
        .map(|i| format!("?{}", i + 3))
        .collect::<Vec<_>>()
        .join(", ");
    let stamp = if touch_processed_at {
        ", processed_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')"
    } else {
        ""
    };
    let sql = format!(
        "UPDATE automation_queue SET status = ?1{stamp}
         WHERE id = ?2 AND status IN ({placeholders})
         RETURNING {ITEM_COLUMNS}"
    );
    let mut values = vec![to.to_string(), id.to_string()];
    values.extend(from.iter().map(ToString::to_string));

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query_map(rusqlite::params_from_iter(values), row_to_item)?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_item(db: &Database, id: &str) -> Result<Option<QueueItem>, PostmillError> {
    let id = id.to_string();
    let sql = format!("SELECT {ITEM_COLUMNS} FROM automation_queue WHERE id = ?1");
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let mut rows = stmt.query_map(params![id], row_to_item)?;
            rows.next().transpose()
        })
        .await
        .map_err(map_tr_err)
}

/// Every item, newest first.
pub async fn list_items(db: &Database) -> Result<Vec<QueueItem>, PostmillError> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM automation_queue ORDER BY created_at DESC, rowid DESC"
    );
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map([], row_to_item)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_pending(db: &Database) -> Result<u64, PostmillError> {
    db.connection()
        .call(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM automation_queue WHERE status = 'pending'",
                [],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map_err(map_tr_err)
        .map(|n| n.max(0) as u64)
}

/// Insert a new `pending` item and return it as stored.
pub async fn insert_item(
    db: &Database,
    topic: &str,
    focus_keyphrase: Option<&str>,
    keywords: Option<&[String]>,
) -> Result<QueueItem, PostmillError> {
    let id = uuid::Uuid::new_v4().to_string();
    let topic = topic.to_string();
    let focus_keyphrase = focus_keyphrase.map(str::to_string);
    let keywords = keywords
        .map(serde_json::to_string)
        .transpose()
        .map_err(PostmillError::storage)?;
    let sql = format!(
        "INSERT INTO automation_queue (id, topic, focus_keyphrase, keywords, status)
         VALUES (?1, ?2, ?3, ?4, 'pending')
         RETURNING {ITEM_COLUMNS}"
    );
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &sql,
                params![id, topic, focus_keyphrase, keywords],
                row_to_item,
            )
        })
        .await
        .map_err(map_tr_err)
}

/// Return every `in_progress` item to `pending`.
pub async fn reset_in_progress(db: &Database) -> Result<u64, PostmillError> {
    db.connection()
        .call(|conn| {
            conn.execute(
                "UPDATE automation_queue SET status = 'pending' WHERE status = 'in_progress'",
                [],
            )
        })
        .await
        .map_err(map_tr_err)
        .map(|n| n as u64)
}
