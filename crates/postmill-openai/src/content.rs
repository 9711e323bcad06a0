// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-draft writer.

use async_trait::async_trait;
use postmill_core::{ContentDraft, DraftWriter, PostmillError};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::OpenAiClient;
use crate::prompts;
use crate::validate::{required_str, string_list};

const STAGE: &str = "content agent";
const TEMPERATURE: f32 = 0.7;

/// [`DraftWriter`] backed by the chat completions API.
pub struct ContentWriter {
    client: OpenAiClient,
}

impl ContentWriter {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

/// Validate a draft object: every field required, tags non-empty.
pub fn parse_draft(map: &Map<String, Value>) -> Result<ContentDraft, PostmillError> {
    Ok(ContentDraft {
        title: required_str(STAGE, map, "title")?,
        excerpt: required_str(STAGE, map, "excerpt")?,
        content: required_str(STAGE, map, "content")?,
        tags: string_list(STAGE, map, "tags", true)?,
        focus_keyphrase: required_str(STAGE, map, "focus_keyphrase")?,
    })
}

#[async_trait]
impl DraftWriter for ContentWriter {
    async fn write_draft(
        &self,
        topic: &str,
        focus_keyphrase: &str,
    ) -> Result<ContentDraft, PostmillError> {
        let map = self
            .client
            .complete_json(
                STAGE,
                &prompts::content_system_prompt(),
                &prompts::content_user_prompt(topic, focus_keyphrase),
                TEMPERATURE,
            )
            .await?;
        let draft = parse_draft(&map)?;
        debug!(title = %draft.title, tags = draft.tags.len(), "draft written");
        Ok(draft)
    }
}
