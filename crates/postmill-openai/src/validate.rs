// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-level validation of structured provider output.
//!
//! Required fields are never defaulted: a missing or wrongly typed field is
//! a [`PostmillError::Validation`] naming the field.

use postmill_core::PostmillError;
use serde_json::{Map, Value};

/// A present, non-blank string, returned trimmed.
pub fn required_str(
    stage: &'static str,
    map: &Map<String, Value>,
    field: &str,
) -> Result<String, PostmillError> {
    match map.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(PostmillError::validation(stage, field)),
    }
}

/// An optional string: absent or null means empty, any other type is invalid.
pub fn optional_str(
    stage: &'static str,
    map: &Map<String, Value>,
    field: &str,
) -> Result<String, PostmillError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(_) => Err(PostmillError::validation(stage, field)),
    }
}

/// A list of scalars rendered as strings. Nested arrays, objects, and nulls
/// are rejected; `require_non_empty` also rejects an empty list.
pub fn string_list(
    stage: &'static str,
    map: &Map<String, Value>,
    field: &str,
    require_non_empty: bool,
) -> Result<Vec<String>, PostmillError> {
    let Some(Value::Array(items)) = map.get(field) else {
        return Err(PostmillError::validation(stage, field));
    };
    if require_non_empty && items.is_empty() {
        return Err(PostmillError::validation(stage, field));
    }
    items
        .iter()
        .map(|v| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(PostmillError::validation(stage, field)),
        })
        .collect()
}

/// A number rounded half to even and clamped to `0..=max`.
///
/// Ties go to the even neighbour, so `84.5` becomes 84 and stays below an
/// 85 publish threshold.
pub fn clamped_score(
    stage: &'static str,
    map: &Map<String, Value>,
    field: &str,
    max: u32,
) -> Result<u32, PostmillError> {
    let value = map
        .get(field)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .ok_or_else(|| PostmillError::validation(stage, field))?;
    Ok(value.round_ties_even().clamp(0.0, f64::from(max)) as u32)
}
