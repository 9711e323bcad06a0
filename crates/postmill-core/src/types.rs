// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the ports, the store, and the orchestrator.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Number of checks in the revision audit checklist.
pub const SEO_CHECKLIST_SIZE: u32 = 17;

/// Run times used when no schedule is persisted or it cannot be read.
pub const FALLBACK_RUN_TIMES: [&str; 3] = ["06:00", "12:00", "18:00"];

/// Timezone used when no schedule is persisted or it cannot be read.
pub const FALLBACK_TIMEZONE: &str = "UTC";

/// Health status reported by store health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// Lifecycle state of a queue item.
///
/// `error` is deliberately absent: failed runs put the item back to
/// `Pending` and record the failure in the log only. `Discarded` is only
/// ever set by an operator reviewing the queue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Pending,
    InProgress,
    Published,
    Held,
    Discarded,
}

/// One topic awaiting or undergoing post generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: String,
    pub topic: String,
    pub focus_keyphrase: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub status: QueueStatus,
    pub created_at: String,
    pub processed_at: Option<String>,
}

impl QueueItem {
    /// The keyphrase to optimise for; blank or missing falls back to the topic.
    pub fn resolved_keyphrase(&self) -> &str {
        self.focus_keyphrase
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or(&self.topic)
    }
}

/// Classification written to the audit log for one pipeline attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Success,
    Draft,
    Held,
    Error,
}

/// Append-only audit record of one pipeline attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub queue_id: Option<String>,
    pub post_id: Option<String>,
    pub status: LogStatus,
    pub confidence_score: Option<u32>,
    pub seo_checks_passed: Option<u32>,
    pub revision_notes: Option<String>,
    pub error_message: Option<String>,
}

impl LogEntry {
    /// Entry for an item stopped at the quality gate.
    pub fn held(queue_id: &str, revision: &RevisionResult) -> Self {
        Self {
            queue_id: Some(queue_id.to_string()),
            post_id: None,
            status: LogStatus::Held,
            confidence_score: Some(revision.confidence_score),
            seo_checks_passed: Some(revision.seo_checks_passed),
            revision_notes: Some(revision.revision_notes.clone()),
            error_message: None,
        }
    }

    /// Entry for an item created on the blog, public (`Success`) or not (`Draft`).
    pub fn published(
        queue_id: &str,
        post_id: &str,
        status: LogStatus,
        revision: &RevisionResult,
    ) -> Self {
        Self {
            queue_id: Some(queue_id.to_string()),
            post_id: Some(post_id.to_string()),
            status,
            confidence_score: Some(revision.confidence_score),
            seo_checks_passed: Some(revision.seo_checks_passed),
            revision_notes: Some(revision.revision_notes.clone()),
            error_message: None,
        }
    }

    /// Entry for a failed attempt.
    pub fn error(queue_id: &str, message: &str) -> Self {
        Self {
            queue_id: Some(queue_id.to_string()),
            post_id: None,
            status: LogStatus::Error,
            confidence_score: None,
            seo_checks_passed: None,
            revision_notes: None,
            error_message: Some(message.to_string()),
        }
    }
}

/// A log entry as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredLogEntry {
    pub id: String,
    pub created_at: String,
    #[serde(flatten)]
    pub entry: LogEntry,
}

/// First draft of a post produced by the draft writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDraft {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    pub focus_keyphrase: String,
}

/// Revised post plus the reviser's quality assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionResult {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: Vec<String>,
    /// 0..=100
    pub confidence_score: u32,
    /// 0..=SEO_CHECKLIST_SIZE
    pub seo_checks_passed: u32,
    pub revision_notes: String,
}

/// A topic idea produced for the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSuggestion {
    pub topic: String,
    pub focus_keyphrase: String,
    pub keywords: Vec<String>,
    pub content_pillar: String,
}

/// Persisted scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSettings {
    pub active: bool,
    pub run_times: Vec<String>,
    pub timezone: String,
}

impl ScheduleSettings {
    /// The fixed schedule applied when persisted settings are unusable.
    pub fn fallback() -> Self {
        Self {
            active: true,
            run_times: FALLBACK_RUN_TIMES.iter().map(|t| t.to_string()).collect(),
            timezone: FALLBACK_TIMEZONE.to_string(),
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Payload for the blog API's create-post call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub cover_image: String,
    pub tags: Vec<String>,
    pub published: bool,
}

/// The blog API's view of a created post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub created_at: String,
}
