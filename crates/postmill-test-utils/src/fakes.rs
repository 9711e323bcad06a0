// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted fakes for every generation and publish port.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use postmill_core::{
    ContentDraft, CoverImageProducer, DraftReviser, DraftWriter, ImageUploader, NewPost,
    PostPublisher, PostmillError, PublishedPost, RevisionResult, TopicSource, TopicSuggestion,
};
use tokio::sync::Mutex;

/// A queue of scripted outcomes followed by an optional default.
///
/// Scripted errors surface as `PostmillError::Provider` with the given text.
pub struct Script<T> {
    steps: Mutex<VecDeque<Result<T, String>>>,
    default: Mutex<Option<T>>,
    calls: AtomicUsize,
}

impl<T: Clone> Script<T> {
    pub fn new(default: Option<T>) -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            default: Mutex::new(default),
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn push_ok(&self, value: T) {
        self.steps.lock().await.push_back(Ok(value));
    }

    pub async fn push_err(&self, message: impl Into<String>) {
        self.steps.lock().await.push_back(Err(message.into()));
    }

    /// Fail `times` times in a row.
    pub async fn fail_times(&self, times: usize, message: &str) {
        for _ in 0..times {
            self.push_err(message).await;
        }
    }

    pub async fn set_default(&self, value: Option<T>) {
        *self.default.lock().await = value;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Next scripted step, or `None` when the script and default are empty.
    async fn next_opt(&self) -> Option<Result<T, PostmillError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = match self.steps.lock().await.pop_front() {
            Some(step) => Some(step),
            None => self.default.lock().await.clone().map(Ok),
        };
        step.map(|s| {
            s.map_err(|message| PostmillError::Provider {
                message,
                source: None,
            })
        })
    }

    async fn next(&self) -> Result<T, PostmillError> {
        self.next_opt()
            .await
            .unwrap_or_else(|| Err(PostmillError::Internal("script exhausted".into())))
    }
}

pub fn sample_draft(topic: &str, focus_keyphrase: &str) -> ContentDraft {
    ContentDraft {
        title: format!("{topic}: a slower way"),
        excerpt: "A short excerpt for the card.".into(),
        content: format!("## {focus_keyphrase}\n\nBody text."),
        tags: vec!["lip care".into(), "rituals".into()],
        focus_keyphrase: focus_keyphrase.into(),
    }
}

pub fn sample_revision(confidence_score: u32) -> RevisionResult {
    RevisionResult {
        title: "Revised title".into(),
        excerpt: "Revised excerpt.".into(),
        content: "## Revised\n\nRevised body.".into(),
        tags: vec!["lip care".into()],
        confidence_score,
        seo_checks_passed: 15,
        revision_notes: "Tightened the intro.".into(),
    }
}

pub fn sample_suggestion(n: usize) -> TopicSuggestion {
    TopicSuggestion {
        topic: format!("Generated topic {n}"),
        focus_keyphrase: format!("keyphrase {n}"),
        keywords: vec![format!("keyword {n}")],
        content_pillar: "lifestyle_intentionality".into(),
    }
}

/// One object standing in for every external service.
///
/// Defaults: drafts derived from the request, a revision scoring 90, a
/// fixed cover URL, and a post with id `post-1`. Topic requests without a
/// scripted answer return `count` generated suggestions.
pub struct FakeServices {
    pub drafts: Script<ContentDraft>,
    pub revisions: Script<RevisionResult>,
    pub covers: Script<String>,
    pub posts: Script<PublishedPost>,
    pub uploads: Script<String>,
    pub topics: Script<Vec<TopicSuggestion>>,
    draft_requests: Mutex<Vec<(String, String)>>,
    cover_requests: Mutex<Vec<(String, String)>>,
    published: Mutex<Vec<NewPost>>,
    topic_requests: Mutex<Vec<(usize, Vec<String>)>>,
    topic_delay: Mutex<Option<Duration>>,
}

impl Default for FakeServices {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeServices {
    pub fn new() -> Self {
        Self {
            drafts: Script::new(None),
            revisions: Script::new(Some(sample_revision(90))),
            covers: Script::new(Some("https://cdn.example.com/cover.png".into())),
            posts: Script::new(Some(PublishedPost {
                id: "post-1".into(),
                slug: "revised-title".into(),
                title: "Revised title".into(),
                created_at: "2026-01-01T00:00:00.000Z".into(),
            })),
            uploads: Script::new(Some("https://cdn.example.com/upload.png".into())),
            topics: Script::new(None),
            draft_requests: Mutex::new(Vec::new()),
            cover_requests: Mutex::new(Vec::new()),
            published: Mutex::new(Vec::new()),
            topic_requests: Mutex::new(Vec::new()),
            topic_delay: Mutex::new(None),
        }
    }

    /// Use `score` for every revision not otherwise scripted.
    pub async fn set_confidence(&self, score: u32) {
        self.revisions.set_default(Some(sample_revision(score))).await;
    }

    /// Make topic requests wait before answering.
    pub async fn set_topic_delay(&self, delay: Duration) {
        *self.topic_delay.lock().await = Some(delay);
    }

    /// `(topic, focus_keyphrase)` for every draft request.
    pub async fn draft_requests(&self) -> Vec<(String, String)> {
        self.draft_requests.lock().await.clone()
    }

    pub async fn cover_requests(&self) -> Vec<(String, String)> {
        self.cover_requests.lock().await.clone()
    }

    /// Every post the publisher was asked to create, including failed attempts.
    pub async fn published(&self) -> Vec<NewPost> {
        self.published.lock().await.clone()
    }

    /// `(count, existing)` for every topic request.
    pub async fn topic_requests(&self) -> Vec<(usize, Vec<String>)> {
        self.topic_requests.lock().await.clone()
    }
}

#[async_trait]
impl DraftWriter for FakeServices {
    async fn write_draft(
        &self,
        topic: &str,
        focus_keyphrase: &str,
    ) -> Result<ContentDraft, PostmillError> {
        self.draft_requests
            .lock()
            .await
            .push((topic.to_string(), focus_keyphrase.to_string()));
        match self.drafts.next_opt().await {
            Some(step) => step,
            None => Ok(sample_draft(topic, focus_keyphrase)),
        }
    }
}

#[async_trait]
impl DraftReviser for FakeServices {
    async fn revise(&self, _draft: &ContentDraft) -> Result<RevisionResult, PostmillError> {
        self.revisions.next().await
    }
}

#[async_trait]
impl CoverImageProducer for FakeServices {
    async fn produce_cover(&self, title: &str, excerpt: &str) -> Result<String, PostmillError> {
        self.cover_requests
            .lock()
            .await
            .push((title.to_string(), excerpt.to_string()));
        self.covers.next().await
    }
}

#[async_trait]
impl PostPublisher for FakeServices {
    async fn create_post(&self, post: &NewPost) -> Result<PublishedPost, PostmillError> {
        self.published.lock().await.push(post.clone());
        self.posts.next().await
    }
}

#[async_trait]
impl ImageUploader for FakeServices {
    async fn upload_image(&self, _bytes: Vec<u8>, _mime_type: &str) -> Result<String, PostmillError> {
        self.uploads.next().await
    }
}

#[async_trait]
impl TopicSource for FakeServices {
    async fn suggest_topics(
        &self,
        count: usize,
        existing: &[String],
    ) -> Result<Vec<TopicSuggestion>, PostmillError> {
        self.topic_requests
            .lock()
            .await
            .push((count, existing.to_vec()));
        let delay = *self.topic_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.topics.next_opt().await {
            Some(step) => step,
            None => Ok((1..=count).map(sample_suggestion).collect()),
        }
    }
}
