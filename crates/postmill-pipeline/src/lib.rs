// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pipeline orchestration for Postmill.
//!
//! [`Pipeline::run_pipeline`] takes one topic from the queue through draft,
//! revision, quality gate, cover image, and publish. It never returns an
//! error: every failure is folded into a [`PipelineResult`] and the item is
//! put back on the queue. [`Replenisher`] refills the queue with new topics
//! and [`PipelineWorkers`] runs either job on a bounded pool of tasks.
//! [`review`] lets an operator requeue or discard held items.

pub mod orchestrator;
pub mod payload;
pub mod replenish;
pub mod result;
pub mod review;
pub mod workers;

pub use orchestrator::{Pipeline, PipelinePorts, PipelineSettings};
pub use payload::validate_payload;
pub use replenish::{ReplenishOutcome, Replenisher};
pub use result::{PipelineResult, PublishOutcome};
pub use review::{discard_item, requeue_item};
pub use workers::PipelineWorkers;
