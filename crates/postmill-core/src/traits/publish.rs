// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publish ports for the blog content API.

use async_trait::async_trait;

use crate::error::PostmillError;
use crate::types::{NewPost, PublishedPost};

/// Creates posts on the blog.
#[async_trait]
pub trait PostPublisher: Send + Sync {
    async fn create_post(&self, post: &NewPost) -> Result<PublishedPost, PostmillError>;
}

/// Stores raw image bytes and returns a public URL.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, bytes: Vec<u8>, mime_type: &str) -> Result<String, PostmillError>;
}
