// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only audit log operations.

use std::str::FromStr;

use postmill_core::{LogEntry, LogStatus, PostmillError, StoredLogEntry};
use rusqlite::params;
use rusqlite::types::Type;

use crate::database::{Database, map_tr_err};

/// Insert one log row. Rows are never updated or deleted afterwards.
pub async fn append_log(db: &Database, entry: &LogEntry) -> Result<(), PostmillError> {
    let id = uuid::Uuid::new_v4().to_string();
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO automation_logs (id, queue_id, post_id, status, confidence_score,
                 seo_checks_passed, revision_notes, error_message)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    id,
                    entry.queue_id,
                    entry.post_id,
                    entry.status.to_string(),
                    entry.confidence_score,
                    entry.seo_checks_passed,
                    entry.revision_notes,
                    entry.error_message,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Most recent `limit` entries, newest first.
pub async fn recent_logs(db: &Database, limit: u32) -> Result<Vec<StoredLogEntry>, PostmillError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, created_at, queue_id, post_id, status, confidence_score,
                        seo_checks_passed, revision_notes, error_message
                 FROM automation_logs
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit], |row| {
                let status: String = row.get(4)?;
                let status = LogStatus::from_str(&status).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                })?;
                Ok(StoredLogEntry {
                    id: row.get(0)?,
                    created_at: row.get(1)?,
                    entry: LogEntry {
                        queue_id: row.get(2)?,
                        post_id: row.get(3)?,
                        status,
                        confidence_score: row.get(5)?,
                        seo_checks_passed: row.get(6)?,
                        revision_notes: row.get(7)?,
                        error_message: row.get(8)?,
                    },
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use postmill_core::RevisionResult;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("logs.db").to_str().unwrap())
            .await
            .unwrap();
        (db, dir)
    }

    fn revision(score: u32) -> RevisionResult {
        RevisionResult {
            title: "t".into(),
            excerpt: "e".into(),
            content: "c".into(),
            tags: vec!["x".into()],
            confidence_score: score,
            seo_checks_passed: 12,
            revision_notes: "tightened intro".into(),
        }
    }

    #[tokio::test]
    async fn entries_read_back_newest_first() {
        let (db, _dir) = setup_db().await;
        append_log(&db, &LogEntry::held("q1", &revision(50)))
            .await
            .unwrap();
        append_log(
            &db,
            &LogEntry::published("q2", "post-9", LogStatus::Success, &revision(91)),
        )
        .await
        .unwrap();
        append_log(&db, &LogEntry::error("q3", "blog API error: 502 bad gateway"))
            .await
            .unwrap();

        let logs = recent_logs(&db, 50).await.unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].entry.status, LogStatus::Error);
        assert_eq!(
            logs[0].entry.error_message.as_deref(),
            Some("blog API error: 502 bad gateway")
        );
        assert_eq!(logs[1].entry.post_id.as_deref(), Some("post-9"));
        assert_eq!(logs[1].entry.confidence_score, Some(91));
        assert_eq!(logs[2].entry.status, LogStatus::Held);
        assert_eq!(logs[2].entry.seo_checks_passed, Some(12));
        assert!(logs[2].entry.post_id.is_none());
    }

    #[tokio::test]
    async fn limit_caps_result_size() {
        let (db, _dir) = setup_db().await;
        for i in 0..5 {
            append_log(&db, &LogEntry::error(&format!("q{i}"), "boom"))
                .await
                .unwrap();
        }
        assert_eq!(recent_logs(&db, 2).await.unwrap().len(), 2);
    }
}
