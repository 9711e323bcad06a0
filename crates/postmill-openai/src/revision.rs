// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checklist audit and revision.

use async_trait::async_trait;
use postmill_core::types::SEO_CHECKLIST_SIZE;
use postmill_core::{ContentDraft, DraftReviser, PostmillError, RevisionResult};
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::OpenAiClient;
use crate::prompts;
use crate::validate::{clamped_score, optional_str, required_str, string_list};

const STAGE: &str = "revision agent";
const TEMPERATURE: f32 = 0.3;

/// [`DraftReviser`] backed by the chat completions API.
pub struct RevisionAgent {
    client: OpenAiClient,
}

impl RevisionAgent {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

/// Validate a revision object.
///
/// Scores are clamped rather than rejected. `revision_notes` may be absent.
pub fn parse_revision(map: &Map<String, Value>) -> Result<RevisionResult, PostmillError> {
    Ok(RevisionResult {
        title: required_str(STAGE, map, "title")?,
        excerpt: required_str(STAGE, map, "excerpt")?,
        content: required_str(STAGE, map, "content")?,
        tags: string_list(STAGE, map, "tags", false)?,
        confidence_score: clamped_score(STAGE, map, "confidence_score", 100)?,
        seo_checks_passed: clamped_score(STAGE, map, "seo_checks_passed", SEO_CHECKLIST_SIZE)?,
        revision_notes: optional_str(STAGE, map, "revision_notes")?,
    })
}

#[async_trait]
impl DraftReviser for RevisionAgent {
    async fn revise(&self, draft: &ContentDraft) -> Result<RevisionResult, PostmillError> {
        let map = self
            .client
            .complete_json(
                STAGE,
                &prompts::revision_system_prompt(),
                &prompts::revision_user_prompt(
                    &draft.title,
                    &draft.excerpt,
                    &draft.content,
                    &draft.tags,
                    &draft.focus_keyphrase,
                ),
                TEMPERATURE,
            )
            .await?;
        let revision = parse_revision(&map)?;
        debug!(
            confidence_score = revision.confidence_score,
            seo_checks_passed = revision.seo_checks_passed,
            "draft revised"
        );
        Ok(revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "title": "Title", "excerpt": "Excerpt", "content": "<p>Body</p>",
            "tags": ["a"], "confidence_score": 88, "seo_checks_passed": 15,
            "revision_notes": "Added FAQ."
        })
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let mut value = base();
        value["confidence_score"] = json!(120.7);
        value["seo_checks_passed"] = json!(-5);
        let r = parse_revision(value.as_object().unwrap()).unwrap();
        assert_eq!(r.confidence_score, 100);
        assert_eq!(r.seo_checks_passed, 0);
    }

    #[test]
    fn half_point_scores_round_to_even() {
        let mut value = base();
        value["confidence_score"] = json!(84.5);
        value["seo_checks_passed"] = json!(14.5);
        let r = parse_revision(value.as_object().unwrap()).unwrap();
        // 84 stays below the default auto-publish threshold of 85.
        assert_eq!(r.confidence_score, 84);
        assert_eq!(r.seo_checks_passed, 14);
    }

    #[test]
    fn checks_clamp_to_checklist_size() {
        let mut value = base();
        value["seo_checks_passed"] = json!(40);
        let r = parse_revision(value.as_object().unwrap()).unwrap();
        assert_eq!(r.seo_checks_passed, SEO_CHECKLIST_SIZE);
    }

    #[test]
    fn missing_score_is_a_validation_error() {
        let mut value = base();
        value.as_object_mut().unwrap().remove("confidence_score");
        let err = parse_revision(value.as_object().unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "revision agent: missing or invalid confidence_score"
        );
    }

    #[test]
    fn notes_are_optional_but_typed() {
        let mut value = base();
        value.as_object_mut().unwrap().remove("revision_notes");
        assert_eq!(
            parse_revision(value.as_object().unwrap())
                .unwrap()
                .revision_notes,
            ""
        );
        value["revision_notes"] = json!(["not", "text"]);
        assert!(parse_revision(value.as_object().unwrap()).is_err());
    }

    #[test]
    fn empty_tags_are_allowed_after_revision() {
        let mut value = base();
        value["tags"] = json!([]);
        assert!(parse_revision(value.as_object().unwrap()).unwrap().tags.is_empty());
    }
}
