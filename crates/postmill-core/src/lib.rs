// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Postmill blog pipeline.
//!
//! This crate provides the error taxonomy, the domain types, and the port
//! traits that the orchestrator depends on. Provider clients, the SQLite
//! store, and test fakes all implement the traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::PostmillError;
pub use types::{
    ContentDraft, HealthStatus, LogEntry, LogStatus, NewPost, PublishedPost, QueueItem,
    QueueStatus, RevisionResult, ScheduleSettings, StoredLogEntry, TopicSuggestion,
};

pub use traits::{
    CoverImageProducer, DraftReviser, DraftWriter, ImageUploader, PostPublisher, QueueStore,
    TopicSource,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn item(keyphrase: Option<&str>) -> QueueItem {
        QueueItem {
            id: "q1".into(),
            topic: "Beeswax versus petroleum jelly".into(),
            focus_keyphrase: keyphrase.map(str::to_string),
            keywords: None,
            status: QueueStatus::Pending,
            created_at: "2026-01-01T00:00:00.000Z".into(),
            processed_at: None,
        }
    }

    #[test]
    fn queue_status_uses_snake_case_names() {
        assert_eq!(QueueStatus::InProgress.to_string(), "in_progress");
        assert_eq!(QueueStatus::from_str("held").unwrap(), QueueStatus::Held);
        assert_eq!(
            QueueStatus::from_str("discarded").unwrap(),
            QueueStatus::Discarded
        );
        assert!(QueueStatus::from_str("error").is_err());
    }

    #[test]
    fn log_status_round_trips_through_serde() {
        let json = serde_json::to_string(&LogStatus::Draft).unwrap();
        assert_eq!(json, "\"draft\"");
        let parsed: LogStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, LogStatus::Draft);
    }

    #[test]
    fn keyphrase_falls_back_to_topic() {
        assert_eq!(item(None).resolved_keyphrase(), "Beeswax versus petroleum jelly");
        assert_eq!(item(Some("  ")).resolved_keyphrase(), "Beeswax versus petroleum jelly");
        assert_eq!(item(Some("beeswax lips")).resolved_keyphrase(), "beeswax lips");
    }

    #[test]
    fn fallback_schedule_is_three_daily_utc_runs() {
        let s = ScheduleSettings::fallback();
        assert!(s.active);
        assert_eq!(s.run_times, vec!["06:00", "12:00", "18:00"]);
        assert_eq!(s.timezone, "UTC");
    }

    #[test]
    fn error_log_entry_carries_only_error_text() {
        let entry = LogEntry::error("q1", "boom");
        assert_eq!(entry.status, LogStatus::Error);
        assert_eq!(entry.error_message.as_deref(), Some("boom"));
        assert!(entry.post_id.is_none());
        assert!(entry.confidence_score.is_none());
    }

    #[test]
    fn all_ports_are_object_safe() {
        fn _store(_: &dyn QueueStore) {}
        fn _topics(_: &dyn TopicSource) {}
        fn _writer(_: &dyn DraftWriter) {}
        fn _reviser(_: &dyn DraftReviser) {}
        fn _cover(_: &dyn CoverImageProducer) {}
        fn _publisher(_: &dyn PostPublisher) {}
        fn _uploader(_: &dyn ImageUploader) {}
    }
}
