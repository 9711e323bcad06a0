// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome of one pipeline run.

use postmill_core::{LogStatus, RevisionResult};
use serde::{Deserialize, Serialize};

/// Message returned when the queue has nothing to claim.
pub const NO_PENDING_TOPICS: &str = "No pending topics in queue";

/// Fields shared by the two outcomes that created a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub topic: String,
    pub post_id: String,
    pub slug: String,
    pub confidence_score: u32,
    pub seo_checks_passed: u32,
    pub revision_notes: String,
}

/// Serialized with a `status` tag: `success`, `draft`, `held`, or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineResult {
    /// Post created and publicly visible.
    Success(PublishOutcome),
    /// Post created as an unpublished draft.
    Draft(PublishOutcome),
    /// Below the draft threshold; nothing was sent to the blog.
    Held {
        topic: String,
        confidence_score: u32,
        seo_checks_passed: u32,
        revision_notes: String,
    },
    /// The run failed. `topic` is absent when no item was claimed.
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        topic: Option<String>,
        error: String,
    },
}

impl PipelineResult {
    pub(crate) fn held(topic: &str, revision: &RevisionResult) -> Self {
        Self::Held {
            topic: topic.to_string(),
            confidence_score: revision.confidence_score,
            seo_checks_passed: revision.seo_checks_passed,
            revision_notes: revision.revision_notes.clone(),
        }
    }

    pub(crate) fn error(topic: Option<&str>, error: impl Into<String>) -> Self {
        Self::Error {
            topic: topic.map(str::to_string),
            error: error.into(),
        }
    }

    /// The audit-log classification of this outcome.
    pub fn status(&self) -> LogStatus {
        match self {
            Self::Success(_) => LogStatus::Success,
            Self::Draft(_) => LogStatus::Draft,
            Self::Held { .. } => LogStatus::Held,
            Self::Error { .. } => LogStatus::Error,
        }
    }

    pub fn topic(&self) -> Option<&str> {
        match self {
            Self::Success(o) | Self::Draft(o) => Some(&o.topic),
            Self::Held { topic, .. } => Some(topic),
            Self::Error { topic, .. } => topic.as_deref(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error, .. } => Some(error),
            _ => None,
        }
    }
}
