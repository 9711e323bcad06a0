// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use postmill_core::{PostmillError, RevisionResult};

/// Local contract check on the assembled post before it is sent.
pub fn validate_payload(revision: &RevisionResult, cover_image_url: &str) -> Result<(), PostmillError> {
    if revision.title.trim().is_empty() {
        return Err(PostmillError::PayloadInvalid("revised title is empty".into()));
    }
    if revision.excerpt.trim().is_empty() {
        return Err(PostmillError::PayloadInvalid("revised excerpt is empty".into()));
    }
    if revision.content.trim().is_empty() {
        return Err(PostmillError::PayloadInvalid("revised content is empty".into()));
    }
    if !cover_image_url.starts_with("http") {
        return Err(PostmillError::PayloadInvalid("invalid cover image URL".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revision() -> RevisionResult {
        RevisionResult {
            title: "Title".into(),
            excerpt: "Excerpt".into(),
            content: "Body".into(),
            tags: vec![],
            confidence_score: 90,
            seo_checks_passed: 15,
            revision_notes: String::new(),
        }
    }

    #[test]
    fn accepts_complete_payload() {
        assert!(validate_payload(&revision(), "https://cdn.example.com/a.png").is_ok());
    }

    #[test]
    fn rejects_blank_fields() {
        let mut r = revision();
        r.excerpt = "  \n".into();
        let err = validate_payload(&r, "https://x").unwrap_err();
        assert_eq!(err.to_string(), "invalid post payload: revised excerpt is empty");
    }

    #[test]
    fn rejects_non_http_cover() {
        let err = validate_payload(&revision(), "ftp://x/a.png").unwrap_err();
        assert!(matches!(err, PostmillError::PayloadInvalid(_)));
        assert!(validate_payload(&revision(), "").is_err());
    }
}
