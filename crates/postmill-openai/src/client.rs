// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions in JSON mode.
//!
//! The client makes exactly one request per call. Retries belong to the
//! orchestrator's retry wrapper, so every failure is returned as-is with the
//! provider's status and body text in the message.

use std::time::Duration;

use postmill_core::PostmillError;
use postmill_core::error::{PREVIEW_CHARS, preview};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatMessage, ChatRequest, ChatResponse, ResponseFormat};

/// Shared handle for one text-generation account.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
    timeout: Duration,
}

/// Map a reqwest failure to `Timeout` when the client deadline expired.
fn transport_error(
    stage: &'static str,
    timeout: Duration,
    context: &str,
    err: reqwest::Error,
) -> PostmillError {
    if err.is_timeout() {
        return PostmillError::Timeout {
            stage,
            duration: timeout,
        };
    }
    PostmillError::Provider {
        message: format!("{stage}: {context}: {err}"),
        source: Some(Box::new(err)),
    }
}

impl OpenAiClient {
    /// Build a client sending `Authorization: Bearer <api_key>`.
    ///
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`.
    pub fn new(
        api_key: &str,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PostmillError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
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

    /// Build from the `[openai]` config section plus the resolved key.
    pub fn from_config(config: &postmill_config::PostmillConfig) -> Result<Self, PostmillError> {
        Self::new(
            &config.openai_api_key()?,
            config.openai.model.clone(),
            config.openai.base_url.clone(),
            Duration::from_secs(config.openai.timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one system + user exchange and return the parsed JSON object.
    ///
    /// `stage` names the calling port in error messages.
    pub async fn complete_json(
        &self,
        stage: &'static str,
        system: &str,
        user: &str,
        temperature: f32,
    ) -> Result<Map<String, Value>, PostmillError> {
        let request = ChatRequest {
            model: self.model.clone(),
            temperature,
            response_format: ResponseFormat::json_object(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(stage, self.timeout, "HTTP request failed", e))?;

        let status = response.status();
        debug!(stage, status = %status, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| {
                transport_error(stage, self.timeout, "failed to read response body", e)
            })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "{stage}: API returned {status} ({}): {} {body}",
                    api_err.error.type_.as_deref().unwrap_or("error"),
                    api_err.error.message
                ),
                Err(_) => format!("{stage}: API returned {status}: {body}"),
            };
            return Err(PostmillError::Provider {
                message,
                source: None,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| PostmillError::Provider {
                message: format!("{stage}: failed to parse API response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let raw = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(PostmillError::EmptyResponse { stage })?;

        parse_object(stage, &raw)
    }
}

/// Parse `raw` as a single JSON object.
pub fn parse_object(stage: &'static str, raw: &str) -> Result<Map<String, Value>, PostmillError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(PostmillError::MalformedResponse {
            stage,
            preview: preview(raw, PREVIEW_CHARS),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test", "gpt-4o", base_url, Duration::from_secs(5)).unwrap()
    }

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn sends_json_mode_request_with_bearer_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"},
                "messages": [{"role": "system", "content": "sys"}, {"role": "user", "content": "usr"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"ok": true}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let map = test_client(&server.uri())
            .complete_json("test agent", "sys", "usr", 0.5)
            .await
            .unwrap();
        assert_eq!(map.get("ok"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn empty_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_json("content agent", "s", "u", 0.7)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "content agent returned empty response");
    }

    #[tokio::test]
    async fn non_json_content_carries_bounded_preview() {
        let server = MockServer::start().await;
        let raw = format!("not json {}", "x".repeat(500));
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(&raw)))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_json("revision agent", "s", "u", 0.3)
            .await
            .unwrap_err();
        match err {
            PostmillError::MalformedResponse { stage, preview } => {
                assert_eq!(stage, "revision agent");
                assert_eq!(preview.chars().count(), 200);
                assert!(preview.starts_with("not json"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_keeps_body_for_retry_hints() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string(
                r#"{"error": {"message": "slow down", "type": "rate_limit"}, "retryDelay": "4s"}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_json("topic agent", "s", "u", 0.85)
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("429"), "got: {msg}");
        assert!(msg.contains("slow down"), "got: {msg}");
        assert!(msg.contains(r#""retryDelay": "4s""#), "got: {msg}");
    }

    #[test]
    fn array_is_not_an_object() {
        let err = parse_object("topic agent", "[1, 2]").unwrap_err();
        assert!(matches!(err, PostmillError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn slow_provider_is_a_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"ok": true}"#))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client =
            OpenAiClient::new("k", "gpt-4o", server.uri(), Duration::from_millis(100)).unwrap();
        let err = client
            .complete_json("content agent", "s", "u", 0.7)
            .await
            .unwrap_err();
        match err {
            PostmillError::Timeout { stage, duration } => {
                assert_eq!(stage, "content agent");
                assert_eq!(duration, Duration::from_millis(100));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
