// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Gemini image generation.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use postmill_core::PostmillError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{
    GenerateRequest, GenerateResponse, GenerationConfig, RequestContent, TextPart,
};

/// Mime type assumed when the provider omits one.
pub const DEFAULT_MIME: &str = "image/png";

/// Decoded image returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

const STAGE: &str = "image agent";

fn transport_error(timeout: Duration, context: &str, err: reqwest::Error) -> PostmillError {
    if err.is_timeout() {
        return PostmillError::Timeout {
            stage: STAGE,
            duration: timeout,
        };
    }
    PostmillError::Provider {
        message: format!("{STAGE}: {context}: {err}"),
        source: Some(Box::new(err)),
    }
}

impl GeminiClient {
    /// `base_url` is the API root, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PostmillError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| PostmillError::Config(format!("invalid API key header value: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PostmillError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn from_config(config: &postmill_config::PostmillConfig) -> Result<Self, PostmillError> {
        Self::new(
            &config.gemini_api_key()?,
            config.gemini.image_model.clone(),
            config.gemini.base_url.clone(),
            Duration::from_secs(config.gemini.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Request an image (and optional text) for `prompt`.
    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse, PostmillError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE".into(), "TEXT".into()],
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(self.timeout, "HTTP request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(self.timeout, "failed to read response body", e))?;
        debug!(status = %status, bytes = body.len(), "image response received");

        if !status.is_success() {
            return Err(PostmillError::Provider {
                message: format!("image agent: API returned {status}: {body}"),
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| PostmillError::Provider {
            message: format!("image agent: failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

/// Log every candidate and part, then decode the first inline image.
pub fn first_inline_image(response: &GenerateResponse) -> Result<GeneratedImage, PostmillError> {
    debug!(candidates = response.candidates.len(), "image candidates");
    for (ci, candidate) in response.candidates.iter().enumerate() {
        let parts = candidate.content.as_ref().map(|c| c.parts.as_slice()).unwrap_or_default();
        debug!(
            candidate = ci,
            finish_reason = candidate.finish_reason.as_deref().unwrap_or("none"),
            parts = parts.len(),
            "image candidate"
        );
        for (pi, part) in parts.iter().enumerate() {
            let text: Option<String> = part.text.as_ref().map(|t| t.chars().take(80).collect());
            debug!(
                candidate = ci,
                part = pi,
                inline_data = part.inline_data.is_some(),
                text = ?text,
                "image part"
            );
        }
    }

    let inline = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
        .ok_or(PostmillError::NoImageReturned)?;

    let bytes = STANDARD
        .decode(inline.data.as_bytes())
        .map_err(|e| PostmillError::Provider {
            message: format!("image agent: inline image is not valid base64: {e}"),
            source: Some(Box::new(e)),
        })?;
    if bytes.is_empty() {
        return Err(PostmillError::NoImageReturned);
    }

    let mime_type = inline
        .mime_type
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MIME.to_string());
    debug!(mime = %mime_type, bytes = bytes.len(), "found inline image");
    Ok(GeneratedImage { bytes, mime_type })
}
