// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use postmill_core::{QueueStatus, QueueStore, ScheduleSettings};
use postmill_cron::Scheduler;
use postmill_gateway::{AuthConfig, GatewayState, build_router};
use postmill_pipeline::PipelineWorkers;
use postmill_test_utils::TestHarness;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn router(h: &TestHarness, api_key: Option<&str>) -> Router {
    let workers = PipelineWorkers::new(h.pipeline.clone(), 2);
    let scheduler = Arc::new(Scheduler::new(workers.clone()).await);
    build_router(GatewayState {
        workers,
        scheduler,
        auth: AuthConfig {
            api_key: api_key.map(str::to_string),
        },
    })
}

async fn send(app: Router, method: &str, uri: &str, key: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        request = request.header("x-api-key", key);
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn health_is_open_and_lists_jobs() {
    let h = TestHarness::builder().build().await;
    let app = router(&h, Some("secret")).await;

    let (status, body) = send(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let ids: Vec<_> = body["scheduled_jobs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, ["pipeline_0600", "pipeline_1200", "pipeline_1800"]);
}

#[tokio::test]
async fn trigger_routes_require_matching_key() {
    let h = TestHarness::builder().with_topics(["Guarded"]).build().await;

    let (status, _) = send(router(&h, Some("secret")).await, "POST", "/pipeline", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        router(&h, Some("secret")).await,
        "POST",
        "/replenish",
        Some("wrong"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(h.fakes.drafts.calls(), 0);
    assert!(h.fakes.topic_requests().await.is_empty());
}

#[tokio::test]
async fn pipeline_route_returns_the_result() {
    let h = TestHarness::builder()
        .with_topics(["Routed"])
        .with_confidence(90)
        .without_replenish()
        .build()
        .await;

    let (status, body) = send(
        router(&h, Some("secret")).await,
        "POST",
        "/pipeline",
        Some("secret"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["topic"], "Routed");
    assert_eq!(body["post_id"], "post-1");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn pipeline_errors_are_reported_with_200() {
    let h = TestHarness::builder().without_replenish().build().await;

    let (status, body) = send(router(&h, None).await, "POST", "/pipeline", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "error", "error": "No pending topics in queue"})
    );
}

#[tokio::test]
async fn replenish_route_reports_added_count() {
    let h = TestHarness::builder().build().await;

    let (status, body) = send(router(&h, None).await, "POST", "/replenish", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"added": 15, "message": "Added 15 topics to the queue"})
    );
    assert_eq!(h.store.count_with_status(QueueStatus::Pending).await, 15);
}

#[tokio::test]
async fn replenish_failure_is_a_500() {
    let h = TestHarness::builder().build().await;
    h.fakes.topics.push_err("topic agent: missing or invalid topics").await;

    let (status, body) = send(router(&h, None).await, "POST", "/replenish", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("missing or invalid topics")
    );
}

#[tokio::test]
async fn reload_schedule_picks_up_new_settings() {
    let h = TestHarness::builder().build().await;
    let app = router(&h, None).await;
    h.store
        .write_schedule_settings(&ScheduleSettings {
            active: true,
            run_times: vec!["08:45".into()],
            timezone: "UTC".into(),
        })
        .await
        .unwrap();

    let (status, body) = send(app, "POST", "/reload-schedule", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule reloaded");
    assert_eq!(body["jobs"][0]["id"], "pipeline_0845");
    assert_eq!(body["jobs"].as_array().unwrap().len(), 1);
}
