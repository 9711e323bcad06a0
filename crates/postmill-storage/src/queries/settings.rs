// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key/value settings and the scheduler's view of them.
//!
//! Values are stored as JSON text. A value that is not valid JSON is read
//! as a plain string so hand-edited rows like `true` or `UTC` still work.

use std::collections::HashMap;

use postmill_core::types::{FALLBACK_RUN_TIMES, FALLBACK_TIMEZONE};
use postmill_core::{PostmillError, ScheduleSettings};
use rusqlite::params;
use serde_json::Value;

use crate::database::{Database, map_tr_err};

pub const SCHEDULER_ACTIVE: &str = "scheduler_active";
pub const SCHEDULER_RUN_TIMES: &str = "scheduler_run_times";
pub const SCHEDULER_TIMEZONE: &str = "scheduler_timezone";

/// Read the given keys. Missing keys are absent from the map.
pub async fn get_settings(
    db: &Database,
    keys: &[&str],
) -> Result<HashMap<String, Value>, PostmillError> {
    let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    let raw = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare("SELECT value FROM app_settings WHERE key = ?1")?;
            let mut found = Vec::new();
            for key in keys {
                let mut rows = stmt.query_map(params![key], |row| row.get::<_, String>(0))?;
                if let Some(value) = rows.next().transpose()? {
                    found.push((key, value));
                }
            }
            Ok::<_, rusqlite::Error>(found)
        })
        .await
        .map_err(map_tr_err)?;

    Ok(raw
        .into_iter()
        .map(|(k, v)| {
            let value = serde_json::from_str(&v).unwrap_or(Value::String(v));
            (k, value)
        })
        .collect())
}

/// Upsert the given key/value pairs.
pub async fn put_settings(db: &Database, values: Vec<(String, Value)>) -> Result<(), PostmillError> {
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO app_settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                )?;
                for (key, value) in values {
                    stmt.execute(params![key, value.to_string()])?;
                }
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Interpret raw settings as a schedule, substituting defaults per key.
///
/// `scheduler_active`: absent means active; only JSON `true` or the string
/// `"true"` count as active. `scheduler_run_times` must be an array of
/// strings. `scheduler_timezone` must be a string.
pub fn schedule_from_values(values: &HashMap<String, Value>) -> ScheduleSettings {
    let active = match values.get(SCHEDULER_ACTIVE) {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(_) => false,
    };

    let run_times = values
        .get(SCHEDULER_RUN_TIMES)
        .and_then(Value::as_array)
        .and_then(|arr| {
            arr.iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
        })
        .unwrap_or_else(|| FALLBACK_RUN_TIMES.iter().map(|t| t.to_string()).collect());

    let timezone = values
        .get(SCHEDULER_TIMEZONE)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_TIMEZONE.to_string());

    ScheduleSettings {
        active,
        run_times,
        timezone,
    }
}

pub async fn read_schedule_settings(db: &Database) -> Result<ScheduleSettings, PostmillError> {
    let values = get_settings(
        db,
        &[SCHEDULER_ACTIVE, SCHEDULER_RUN_TIMES, SCHEDULER_TIMEZONE],
    )
    .await?;
    Ok(schedule_from_values(&values))
}

pub async fn write_schedule_settings(
    db: &Database,
    settings: &ScheduleSettings,
) -> Result<(), PostmillError> {
    put_settings(
        db,
        vec![
            (SCHEDULER_ACTIVE.to_string(), Value::Bool(settings.active)),
            (
                SCHEDULER_RUN_TIMES.to_string(),
                Value::from(settings.run_times.clone()),
            ),
            (
                SCHEDULER_TIMEZONE.to_string(),
                Value::String(settings.timezone.clone()),
            ),
        ],
    )
    .await
}
