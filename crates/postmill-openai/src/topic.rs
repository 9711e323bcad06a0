// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Topic suggestions for queue replenishment.

use async_trait::async_trait;
use postmill_core::{PostmillError, TopicSource, TopicSuggestion};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::OpenAiClient;
use crate::prompts::{self, DEFAULT_PILLAR};
use crate::validate::required_str;

const STAGE: &str = "topic agent";
const TEMPERATURE: f32 = 0.85;

/// [`TopicSource`] backed by the chat completions API.
pub struct TopicAgent {
    client: OpenAiClient,
}

impl TopicAgent {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

/// Validate a `{"topics": [...]}` object.
///
/// `topic` and `focus_keyphrase` are required per entry. `keywords` that is
/// not a list becomes empty, and a missing `content_pillar` defaults.
pub fn parse_topics(map: &Map<String, Value>) -> Result<Vec<TopicSuggestion>, PostmillError> {
    let Some(Value::Array(items)) = map.get("topics") else {
        return Err(PostmillError::validation(STAGE, "topics"));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let Value::Object(entry) = item else {
                return Err(PostmillError::validation(STAGE, format!("topics[{i}]")));
            };
            let topic = required_str(STAGE, entry, "topic")
                .map_err(|_| PostmillError::validation(STAGE, format!("topics[{i}].topic")))?;
            let focus_keyphrase = required_str(STAGE, entry, "focus_keyphrase").map_err(|_| {
                PostmillError::validation(STAGE, format!("topics[{i}].focus_keyphrase"))
            })?;
            let keywords = match entry.get("keywords") {
                Some(Value::Array(words)) => words
                    .iter()
                    .map(|w| match w {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
                _ => Vec::new(),
            };
            let content_pillar = match entry.get("content_pillar") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                _ => DEFAULT_PILLAR.to_string(),
            };
            Ok(TopicSuggestion {
                topic,
                focus_keyphrase,
                keywords,
                content_pillar,
            })
        })
        .collect()
}

#[async_trait]
impl TopicSource for TopicAgent {
    async fn suggest_topics(
        &self,
        count: usize,
        existing: &[String],
    ) -> Result<Vec<TopicSuggestion>, PostmillError> {
        let map = self
            .client
            .complete_json(
                STAGE,
                &prompts::topic_system_prompt(),
                &prompts::topic_user_prompt(count, existing),
                TEMPERATURE,
            )
            .await?;
        let topics = parse_topics(&map)?;
        debug!(requested = count, received = topics.len(), "topics suggested");
        Ok(topics)
    }
}
