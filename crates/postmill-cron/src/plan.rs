// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translating schedule settings into cron jobs.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use croner::Cron;
use postmill_core::{PostmillError, ScheduleSettings};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound on run times accepted by [`validate_schedule`].
pub const MAX_RUN_TIMES: usize = 5;

static RUN_TIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]?\d|2[0-3]):([0-5]\d)$").expect("valid run time regex"));

/// `(hour, minute)` of an `HH:MM` run time.
pub fn parse_run_time(value: &str) -> Option<(u32, u32)> {
    let caps = RUN_TIME.captures(value.trim())?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Check settings before they are written.
pub fn validate_schedule(settings: &ScheduleSettings) -> Result<(), PostmillError> {
    let count = settings.run_times.len();
    if count == 0 || count > MAX_RUN_TIMES {
        return Err(PostmillError::Config(format!(
            "expected 1 to {MAX_RUN_TIMES} run times, got {count}"
        )));
    }
    for time in &settings.run_times {
        if parse_run_time(time).is_none() {
            return Err(PostmillError::Config(format!(
                "run time '{time}' is not a 24-hour HH:MM value"
            )));
        }
    }
    parse_timezone(&settings.timezone)?;
    Ok(())
}

fn parse_timezone(name: &str) -> Result<Tz, PostmillError> {
    name.parse::<Tz>()
        .map_err(|e| PostmillError::Config(format!("unknown timezone '{name}': {e}")))
}

/// Health-check view of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub id: String,
    pub next_run: Option<String>,
}

pub struct ScheduledJob {
    id: String,
    expression: String,
    cron: Cron,
}

impl ScheduledJob {
    fn daily(hour: u32, minute: u32) -> Result<Self, PostmillError> {
        let expression = format!("{minute} {hour} * * *");
        let cron = Cron::from_str(&expression)
            .map_err(|e| PostmillError::Config(format!("invalid cron '{expression}': {e}")))?;
        Ok(Self {
            id: format!("pipeline_{hour:02}{minute:02}"),
            expression,
            cron,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// First firing strictly after `after`, evaluated in `tz`.
    pub fn next_after(&self, after: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
        self.cron
            .find_next_occurrence(&after.with_timezone(&tz), false)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// The active job set and the timezone it is evaluated in.
pub struct SchedulePlan {
    timezone: Tz,
    jobs: Vec<ScheduledJob>,
    fallback: bool,
}

impl SchedulePlan {
    /// Build jobs from persisted settings. Duplicate times collapse into one job.
    pub fn from_settings(settings: &ScheduleSettings) -> Result<Self, PostmillError> {
        let timezone = parse_timezone(&settings.timezone)?;
        let mut jobs: Vec<ScheduledJob> = Vec::new();
        for time in &settings.run_times {
            let (hour, minute) = parse_run_time(time).ok_or_else(|| {
                PostmillError::Config(format!("run time '{time}' is not HH:MM"))
            })?;
            let job = ScheduledJob::daily(hour, minute)?;
            if !jobs.iter().any(|j| j.id == job.id) {
                jobs.push(job);
            }
        }
        Ok(Self {
            timezone,
            jobs,
            fallback: false,
        })
    }

    /// 06:00, 12:00, and 18:00 UTC.
    pub fn fallback() -> Self {
        let mut plan = Self::from_settings(&ScheduleSettings::fallback()).unwrap_or(Self {
            timezone: Tz::UTC,
            jobs: Vec::new(),
            fallback: true,
        });
        plan.fallback = true;
        plan
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn jobs(&self) -> &[ScheduledJob] {
        &self.jobs
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// The earliest firing after `after` and every job due at that instant.
    pub fn next_due(&self, after: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<String>)> {
        let mut earliest: Option<(DateTime<Utc>, Vec<String>)> = None;
        for job in &self.jobs {
            let Some(at) = job.next_after(after, self.timezone) else {
                continue;
            };
            match earliest.as_mut() {
                Some((best, ids)) if at == *best => {
                    ids.push(job.id.clone());
                    continue;
                }
                Some((best, _)) if at > *best => continue,
                _ => {}
            }
            earliest = Some((at, vec![job.id.clone()]));
        }
        earliest
    }

    pub fn job_infos(&self, now: DateTime<Utc>) -> Vec<JobInfo> {
        self.jobs
            .iter()
            .map(|job| JobInfo {
                id: job.id.clone(),
                next_run: job
                    .next_after(now, self.timezone)
                    .map(|t| t.with_timezone(&self.timezone).to_rfc3339()),
            })
            .collect()
    }
}
