// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generation ports wrapping the generative text and image services.

use async_trait::async_trait;

use crate::error::PostmillError;
use crate::types::{ContentDraft, RevisionResult, TopicSuggestion};

/// Produces new topic ideas for the queue.
#[async_trait]
pub trait TopicSource: Send + Sync {
    /// Requests `count` suggestions, passing `existing` topics as an overlap hint.
    async fn suggest_topics(
        &self,
        count: usize,
        existing: &[String],
    ) -> Result<Vec<TopicSuggestion>, PostmillError>;
}

/// Writes the first draft of a post.
#[async_trait]
pub trait DraftWriter: Send + Sync {
    async fn write_draft(
        &self,
        topic: &str,
        focus_keyphrase: &str,
    ) -> Result<ContentDraft, PostmillError>;
}

/// Audits a draft against the SEO checklist and returns an improved version.
#[async_trait]
pub trait DraftReviser: Send + Sync {
    async fn revise(&self, draft: &ContentDraft) -> Result<RevisionResult, PostmillError>;
}

/// Generates a cover image, uploads it, and returns its public URL.
#[async_trait]
pub trait CoverImageProducer: Send + Sync {
    async fn produce_cover(&self, title: &str, excerpt: &str) -> Result<String, PostmillError>;
}
