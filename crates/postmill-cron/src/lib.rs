// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily pipeline scheduler for Postmill.
//!
//! Persisted [`ScheduleSettings`](postmill_core::ScheduleSettings) become one
//! cron job per run time in the configured timezone. Unusable settings fall
//! back to 06:00, 12:00, and 18:00 UTC.

pub mod plan;
pub mod scheduler;

pub use plan::{JobInfo, SchedulePlan, ScheduledJob, parse_run_time, validate_schedule};
pub use scheduler::Scheduler;
