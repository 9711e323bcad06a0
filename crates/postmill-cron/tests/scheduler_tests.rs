// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use postmill_core::{QueueStatus, QueueStore, ScheduleSettings};
use postmill_cron::Scheduler;
use postmill_pipeline::PipelineWorkers;
use postmill_test_utils::{StoreOp, TestHarness};
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

fn daily(times: &[&str], timezone: &str, active: bool) -> ScheduleSettings {
    ScheduleSettings {
        active,
        run_times: times.iter().map(|t| t.to_string()).collect(),
        timezone: timezone.into(),
    }
}

async fn scheduler_for(h: &TestHarness) -> Arc<Scheduler> {
    Arc::new(Scheduler::new(PipelineWorkers::new(h.pipeline.clone(), 2)).await)
}

/// Let the scheduler run for `span` of paused tokio time, then stop it.
async fn run_for(scheduler: Arc<Scheduler>, span: Duration) {
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));
    tokio::time::sleep(span).await;
    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn persisted_schedule_becomes_jobs() {
    let h = TestHarness::builder().build().await;
    h.store
        .write_schedule_settings(&daily(&["07:15", "21:00"], "Europe/Berlin", true))
        .await
        .unwrap();

    let jobs = scheduler_for(&h).await.jobs().await;

    let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, ["pipeline_0715", "pipeline_2100"]);
    assert!(jobs.iter().all(|j| j.next_run.is_some()));
}

#[tokio::test]
#[traced_test]
async fn unreadable_settings_use_fallback() {
    let h = TestHarness::builder().build().await;
    h.store.fail(StoreOp::ReadSettings).await;

    let jobs = scheduler_for(&h).await.jobs().await;

    let ids: Vec<_> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, ["pipeline_0600", "pipeline_1200", "pipeline_1800"]);
    assert!(logs_contain("failed to load schedule, using fallback"));
}

#[tokio::test]
async fn invalid_timezone_uses_fallback() {
    let h = TestHarness::builder().build().await;
    h.store
        .write_schedule_settings(&daily(&["09:00"], "Atlantis/Capital", true))
        .await
        .unwrap();

    let jobs = scheduler_for(&h).await.jobs().await;

    assert_eq!(jobs.len(), 3);
    assert!(jobs[0].next_run.as_deref().unwrap().ends_with("+00:00"));
}

#[tokio::test]
async fn reload_replaces_jobs() {
    let h = TestHarness::builder().build().await;
    let scheduler = scheduler_for(&h).await;
    assert_eq!(scheduler.jobs().await.len(), 3);

    h.store
        .write_schedule_settings(&daily(&["10:30"], "UTC", true))
        .await
        .unwrap();
    let reloaded = scheduler.reload().await;

    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, "pipeline_1030");
    assert_eq!(scheduler.jobs().await, reloaded);
}

#[tokio::test(start_paused = true)]
async fn due_job_runs_the_pipeline() {
    let h = TestHarness::builder()
        .with_topics(["Scheduled topic"])
        .without_replenish()
        .build()
        .await;
    h.store
        .write_schedule_settings(&daily(&["06:00"], "UTC", true))
        .await
        .unwrap();

    run_for(scheduler_for(&h).await, Duration::from_secs(25 * 60 * 60)).await;

    assert_eq!(
        h.item_by_topic("Scheduled topic").await.unwrap().status,
        QueueStatus::Published
    );
}

#[tokio::test(start_paused = true)]
#[traced_test]
async fn paused_schedule_skips_runs() {
    let h = TestHarness::builder()
        .with_topics(["Waiting topic"])
        .without_replenish()
        .build()
        .await;
    h.store
        .write_schedule_settings(&daily(&["06:00"], "UTC", false))
        .await
        .unwrap();

    run_for(scheduler_for(&h).await, Duration::from_secs(25 * 60 * 60)).await;

    assert_eq!(h.fakes.drafts.calls(), 0);
    assert_eq!(
        h.item_by_topic("Waiting topic").await.unwrap().status,
        QueueStatus::Pending
    );
    assert!(logs_contain("scheduler paused, skipping run"));
}

#[tokio::test]
async fn cancel_stops_an_idle_loop() {
    let h = TestHarness::builder().build().await;
    let scheduler = scheduler_for(&h).await;
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(scheduler.run(cancel.clone()));

    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("scheduler should stop promptly")
        .unwrap();
}
