// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline runs against mocked provider and blog APIs.

use base64::Engine;
use postmill::app::App;
use postmill::commands;
use postmill_config::PostmillConfig;
use postmill_core::{LogStatus, PostmillError, QueueStatus, QueueStore};
use postmill_pipeline::{PipelineResult, requeue_item};
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Mocks {
    openai: MockServer,
    gemini: MockServer,
    blog: MockServer,
}

fn completion(body: Value) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": body.to_string()}}]})
}

async fn start_mocks(confidence: f64) -> Mocks {
    let openai = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"temperature": 0.7})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "title": "Draft title",
            "excerpt": "Draft excerpt",
            "content": "<p>Draft body</p>",
            "tags": ["lip care"],
            "focus_keyphrase": "winter lip care"
        }))))
        .mount(&openai)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"temperature": 0.3})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "title": "Winter lip care that works",
            "excerpt": "What actually helps cracked lips in the cold.",
            "content": "<h2>Start with a barrier</h2><p>Beeswax holds moisture in.</p>",
            "tags": ["lip care", "winter"],
            "confidence_score": confidence,
            "seo_checks_passed": 16,
            "revision_notes": "Tightened the intro."
        }))))
        .mount(&openai)
        .await;

    let gemini = MockServer::start().await;
    let image = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG fake image");
    Mock::given(method("POST"))
        .and(path("/models/image-model:generateContent"))
        .and(header("x-goog-api-key", "gemini-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [
                {"text": "here you go"},
                {"inlineData": {"mimeType": "image/png", "data": image}}
            ]}}]
        })))
        .mount(&gemini)
        .await;

    let blog = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/upload"))
        .and(header("x-admin-password", "admin-secret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"url": "https://cdn.example.com/covers/winter.png"})),
        )
        .mount(&blog)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/posts"))
        .and(header("x-api-key", "blog-key"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "post": {
                "id": "post-42",
                "slug": "winter-lip-care-that-works",
                "title": "Winter lip care that works",
                "created_at": "2026-01-01T00:00:00Z"
            }
        })))
        .mount(&blog)
        .await;

    Mocks {
        openai,
        gemini,
        blog,
    }
}

fn config_for(mocks: &Mocks, db_path: &std::path::Path) -> PostmillConfig {
    let toml = format!(
        r#"
[openai]
api_key = "openai-key"
base_url = "{openai}"

[gemini]
api_key = "gemini-key"
image_model = "image-model"
base_url = "{gemini}"

[blog]
api_url = "{blog}"
api_key = "blog-key"
admin_password = "admin-secret"

[storage]
database_path = "{db}"

[pipeline]
max_retries = 0
retry_base_delay_ms = 1
replenish_threshold = 0
"#,
        openai = mocks.openai.uri(),
        gemini = mocks.gemini.uri(),
        blog = mocks.blog.uri(),
        db = db_path.display(),
    );
    match postmill_config::load_and_validate_str(&toml) {
        Ok(config) => config,
        Err(errors) => panic!("test config should be valid: {errors:?}"),
    }
}

#[tokio::test]
async fn high_confidence_run_publishes_post() {
    let mocks = start_mocks(92.0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    let item = app
        .store
        .insert_item("Winter lip care", Some("winter lip care"), None)
        .await
        .unwrap();

    let result = app.workers.run_pipeline().await.unwrap();
    match &result {
        PipelineResult::Success(outcome) => {
            assert_eq!(outcome.post_id, "post-42");
            assert_eq!(outcome.slug, "winter-lip-care-that-works");
            assert_eq!(outcome.confidence_score, 92);
        }
        other => panic!("expected success, got {other:?}"),
    }

    let items = app.store.list_items().await.unwrap();
    let stored = items.iter().find(|i| i.id == item.id).unwrap();
    assert_eq!(stored.status, QueueStatus::Published);
    assert!(stored.processed_at.is_some());

    let logs = app.store.recent_logs(10).await.unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].entry.status, LogStatus::Success);
    assert_eq!(logs[0].entry.post_id.as_deref(), Some("post-42"));

    let posts: Vec<_> = mocks
        .blog
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/posts")
        .collect();
    assert_eq!(posts.len(), 1);
    let body: Value = serde_json::from_slice(&posts[0].body).unwrap();
    assert_eq!(body["title"], "Winter lip care that works");
    assert_eq!(body["published"], true);
    assert_eq!(body["cover_image"], "https://cdn.example.com/covers/winter.png");

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn half_point_score_below_publish_threshold_creates_draft() {
    let mocks = start_mocks(84.5).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    app.store
        .insert_item("Winter lip care", None, None)
        .await
        .unwrap();

    let result = app.workers.run_pipeline().await.unwrap();
    match &result {
        PipelineResult::Draft(outcome) => assert_eq!(outcome.confidence_score, 84),
        other => panic!("expected draft, got {other:?}"),
    }

    let posts: Vec<_> = mocks
        .blog
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.path() == "/api/posts")
        .collect();
    assert_eq!(posts.len(), 1);
    let body: Value = serde_json::from_slice(&posts[0].body).unwrap();
    assert_eq!(body["published"], false);

    let logs = app.store.recent_logs(10).await.unwrap();
    assert_eq!(logs[0].entry.status, LogStatus::Draft);

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn low_confidence_run_holds_item_without_publishing() {
    let mocks = start_mocks(40.0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    app.store
        .insert_item("Winter lip care", None, None)
        .await
        .unwrap();

    let result = app.workers.run_pipeline().await.unwrap();
    assert!(matches!(result, PipelineResult::Held { confidence_score: 40, .. }));

    let items = app.store.list_items().await.unwrap();
    assert_eq!(items[0].status, QueueStatus::Held);
    assert!(mocks.gemini.received_requests().await.unwrap().is_empty());
    assert!(mocks.blog.received_requests().await.unwrap().is_empty());

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn empty_queue_reports_no_pending_topics() {
    let mocks = start_mocks(92.0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    let result = app.workers.run_pipeline().await.unwrap();
    assert_eq!(result.error_message(), Some("No pending topics in queue"));
    assert!(mocks.openai.received_requests().await.unwrap().is_empty());

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn held_item_is_requeued_then_discarded_from_the_cli() {
    let mocks = start_mocks(40.0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    let item = app
        .store
        .insert_item("Winter lip care", None, None)
        .await
        .unwrap();
    let result = app.workers.run_pipeline().await.unwrap();
    assert!(matches!(result, PipelineResult::Held { .. }));

    commands::queue_requeue(&config, &item.id).await.unwrap();
    let stored = app.store.get_item(&item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Pending);
    assert_eq!(stored.created_at, item.created_at);

    commands::queue_discard(&config, &item.id).await.unwrap();
    let stored = app.store.get_item(&item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Discarded);
    assert!(stored.processed_at.is_some());

    let err = commands::queue_discard(&config, &item.id).await.unwrap_err();
    assert!(matches!(
        err,
        PostmillError::InvalidTransition {
            from: QueueStatus::Discarded,
            ..
        }
    ));
    let err = commands::queue_requeue(&config, "no-such-item").await.unwrap_err();
    assert!(matches!(err, PostmillError::ItemNotFound(_)));

    let result = app.workers.run_pipeline().await.unwrap();
    assert_eq!(result.error_message(), Some("No pending topics in queue"));

    app.shutdown().await.unwrap();
}

#[tokio::test]
async fn published_item_cannot_be_requeued() {
    let mocks = start_mocks(92.0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&mocks, &dir.path().join("postmill.db"));

    let app = App::build(&config).await.unwrap();
    let item = app
        .store
        .insert_item("Winter lip care", None, None)
        .await
        .unwrap();
    let result = app.workers.run_pipeline().await.unwrap();
    assert!(matches!(result, PipelineResult::Success(_)));

    let err = requeue_item(app.store.as_ref(), &item.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PostmillError::InvalidTransition {
            from: QueueStatus::Published,
            to: QueueStatus::Pending,
            ..
        }
    ));
    let stored = app.store.get_item(&item.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueueStatus::Published);

    app.shutdown().await.unwrap();
}
