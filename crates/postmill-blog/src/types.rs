// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the blog content API.

use serde::Deserialize;

/// `POST /api/posts` success body.
#[derive(Debug, Deserialize)]
pub struct CreatePostResponse {
    #[serde(default)]
    pub post: Option<PostBody>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PostBody {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// `POST /api/admin/upload` success body.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub url: Option<String>,
}
