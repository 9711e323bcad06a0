// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for post creation and image upload.

use std::time::Duration;

use async_trait::async_trait;
use postmill_core::error::preview;
use postmill_core::{ImageUploader, NewPost, PostPublisher, PostmillError, PublishedPost};
use rand::Rng;
use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use crate::types::{CreatePostResponse, UploadResponse};

/// Error bodies are cut to this many characters.
const ERROR_BODY_CHARS: usize = 300;

const FILENAME_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// `{unix_seconds}-{8 lowercase alnum}.{ext}` for an upload of `mime_type`.
pub fn upload_filename<R: Rng>(mime_type: &str, unix_seconds: i64, rng: &mut R) -> String {
    let ext = match mime_type {
        "image/png" => "png",
        "image/webp" => "webp",
        _ => "jpg",
    };
    let suffix: String = (0..8)
        .map(|_| FILENAME_ALPHABET[rng.gen_range(0..FILENAME_ALPHABET.len())] as char)
        .collect();
    format!("{unix_seconds}-{suffix}.{ext}")
}

#[derive(Debug, Clone)]
pub struct BlogClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    admin_password: String,
    publish_timeout: Duration,
    upload_timeout: Duration,
}

impl BlogClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        admin_password: impl Into<String>,
        publish_timeout: Duration,
        upload_timeout: Duration,
    ) -> Result<Self, PostmillError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| PostmillError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            admin_password: admin_password.into(),
            publish_timeout,
            upload_timeout,
        })
    }

    pub fn from_config(config: &postmill_config::PostmillConfig) -> Result<Self, PostmillError> {
        Self::new(
            config.blog.api_url.clone(),
            config.blog_api_key()?,
            config.admin_password()?,
            Duration::from_secs(config.blog.publish_timeout_secs),
            Duration::from_secs(config.blog.upload_timeout_secs),
        )
    }

    fn publish_transport_error(&self, context: &str, err: reqwest::Error) -> PostmillError {
        if err.is_timeout() {
            return PostmillError::Timeout {
                stage: "blog API",
                duration: self.publish_timeout,
            };
        }
        PostmillError::Provider {
            message: format!("blog API: {context}: {err}"),
            source: Some(Box::new(err)),
        }
    }

    fn upload_transport_error(&self, context: &str, err: reqwest::Error) -> PostmillError {
        if err.is_timeout() {
            return PostmillError::Timeout {
                stage: "image upload",
                duration: self.upload_timeout,
            };
        }
        PostmillError::UploadRejected {
            message: format!("{context}: {err}"),
        }
    }

    fn status_line(status: reqwest::StatusCode) -> String {
        match status.canonical_reason() {
            Some(reason) => format!("{} {reason}", status.as_u16()),
            None => status.as_u16().to_string(),
        }
    }
}

#[async_trait]
impl PostPublisher for BlogClient {
    async fn create_post(&self, post: &NewPost) -> Result<PublishedPost, PostmillError> {
        let response = self
            .client
            .post(format!("{}/api/posts", self.api_url))
            .header("x-api-key", &self.api_key)
            .timeout(self.publish_timeout)
            .json(post)
            .send()
            .await
            .map_err(|e| self.publish_transport_error("HTTP request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.publish_transport_error("failed to read response body", e))?;

        if !status.is_success() {
            return Err(PostmillError::PublishRejected {
                status: status.as_u16(),
                body: preview(&body, ERROR_BODY_CHARS),
            });
        }

        let parsed: CreatePostResponse =
            serde_json::from_str(&body).map_err(|e| PostmillError::PublishRejected {
                status: status.as_u16(),
                body: format!("unreadable response ({e}): {}", preview(&body, ERROR_BODY_CHARS)),
            })?;
        let post_body = parsed.post.unwrap_or_default();
        let id = post_body
            .id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| PostmillError::PublishRejected {
                status: status.as_u16(),
                body: "response missing post.id".into(),
            })?;

        let created = PublishedPost {
            id,
            slug: post_body.slug.unwrap_or_default(),
            title: post_body.title.unwrap_or_default(),
            created_at: post_body.created_at.unwrap_or_default(),
        };
        info!(post_id = %created.id, slug = %created.slug, published = post.published, "post created");
        Ok(created)
    }
}

#[async_trait]
impl ImageUploader for BlogClient {
    async fn upload_image(&self, bytes: Vec<u8>, mime_type: &str) -> Result<String, PostmillError> {
        let filename = upload_filename(
            mime_type,
            chrono::Utc::now().timestamp(),
            &mut rand::thread_rng(),
        );
        let size = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(filename.clone())
            .mime_str(mime_type)
            .map_err(|e| PostmillError::UploadRejected {
                message: format!("invalid mime type {mime_type}: {e}"),
            })?;
        let form = Form::new().part("file", part);

        debug!(filename = %filename, bytes = size, "uploading image");
        let response = self
            .client
            .post(format!("{}/api/admin/upload", self.api_url))
            .header("x-admin-password", &self.admin_password)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.upload_transport_error("HTTP request failed", e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.upload_transport_error("failed to read response body", e))?;

        if !status.is_success() {
            return Err(PostmillError::UploadRejected {
                message: format!(
                    "{}: {}",
                    Self::status_line(status),
                    preview(&body, ERROR_BODY_CHARS)
                ),
            });
        }

        let url = serde_json::from_str::<UploadResponse>(&body)
            .ok()
            .and_then(|r| r.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| PostmillError::UploadRejected {
                message: "upload response missing url field".into(),
            })?;
        debug!(url = %url, "image uploaded");
        Ok(url)
    }
}
