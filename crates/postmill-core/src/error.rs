// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Postmill pipeline.

use thiserror::Error;

use crate::types::QueueStatus;

/// Maximum number of characters of raw provider output carried in an error.
pub const PREVIEW_CHARS: usize = 200;

/// The primary error type used across all Postmill ports and the orchestrator.
#[derive(Debug, Error)]
pub enum PostmillError {
    /// Configuration errors (invalid TOML, missing secrets, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// A generative provider returned no content at all.
    #[error("{stage} returned empty response")]
    EmptyResponse { stage: &'static str },

    /// A generative provider returned content that is not a JSON object.
    #[error("{stage} returned invalid JSON: {preview}")]
    MalformedResponse { stage: &'static str, preview: String },

    /// Structured output was missing a required field or had the wrong type.
    #[error("{stage}: missing or invalid {field}")]
    Validation { stage: &'static str, field: String },

    /// The image provider answered without any inline image payload.
    #[error("image agent: no image returned from provider")]
    NoImageReturned,

    /// The blog API refused to create the post.
    #[error("blog API error: {status} {body}")]
    PublishRejected { status: u16, body: String },

    /// The upload endpoint refused the image or answered without a URL.
    #[error("upload failed: {message}")]
    UploadRejected { message: String },

    /// No queue item has the given id.
    #[error("queue item {0} not found")]
    ItemNotFound(String),

    /// An operator asked for a status change the item's current status forbids.
    #[error("queue item {id} is {from}, cannot move it to {to}")]
    InvalidTransition {
        id: String,
        from: QueueStatus,
        to: QueueStatus,
    },

    /// Storage backend errors (connection, query failure, decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The assembled post failed the local contract check before publishing.
    #[error("invalid post payload: {0}")]
    PayloadInvalid(String),

    /// Transport failure or non-success status from a generative provider.
    ///
    /// The message keeps the provider's body text so retry hints such as
    /// `"retryDelay": "7s"` stay visible to the retry wrapper.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An HTTP call to a provider or the blog API hit its timeout.
    #[error("{stage} timed out after {duration:?}")]
    Timeout {
        stage: &'static str,
        duration: std::time::Duration,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PostmillError {
    /// Wrap any error as a storage failure.
    pub fn storage(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Build a validation error for `field` reported by `stage`.
    pub fn validation(stage: &'static str, field: impl Into<String>) -> Self {
        Self::Validation {
            stage,
            field: field.into(),
        }
    }
}

/// Truncate `text` to at most `max_chars` characters on a char boundary.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_text() {
        assert_eq!(preview("short", 200), "short");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(300);
        let cut = preview(&text, PREVIEW_CHARS);
        assert_eq!(cut.chars().count(), 200);
    }

    #[test]
    fn validation_message_names_field() {
        let err = PostmillError::validation("content agent", "title");
        assert_eq!(err.to_string(), "content agent: missing or invalid title");
    }

    #[test]
    fn invalid_transition_names_both_statuses() {
        let err = PostmillError::InvalidTransition {
            id: "q1".into(),
            from: QueueStatus::Published,
            to: QueueStatus::Pending,
        };
        assert_eq!(
            err.to_string(),
            "queue item q1 is published, cannot move it to pending"
        );
    }

    #[test]
    fn timeout_names_stage_and_duration() {
        let err = PostmillError::Timeout {
            stage: "blog API",
            duration: std::time::Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "blog API timed out after 30s");
    }

    #[test]
    fn provider_message_keeps_body_text() {
        let err = PostmillError::Provider {
            message: r#"API returned 429: {"retryDelay": "7s"}"#.into(),
            source: None,
        };
        assert!(err.to_string().contains(r#""retryDelay": "7s""#));
    }
}
