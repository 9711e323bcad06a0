// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret resolution: config value first, then the conventional env var.

use postmill_core::PostmillError;

use crate::model::PostmillConfig;

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const BLOG_API_KEY_ENV: &str = "BLOG_API_KEY";
pub const ADMIN_PASSWORD_ENV: &str = "ADMIN_PASSWORD";
pub const GATEWAY_API_KEY_ENV: &str = "POSTMILL_API_KEY";

fn resolve(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok().filter(|v| !v.trim().is_empty()))
}

fn require(configured: Option<&str>, env_var: &str, key: &str) -> Result<String, PostmillError> {
    resolve(configured, env_var).ok_or_else(|| {
        PostmillError::Config(format!("{key} is not set (config or {env_var})"))
    })
}

impl PostmillConfig {
    pub fn openai_api_key(&self) -> Result<String, PostmillError> {
        require(self.openai.api_key.as_deref(), OPENAI_API_KEY_ENV, "openai.api_key")
    }

    pub fn gemini_api_key(&self) -> Result<String, PostmillError> {
        require(self.gemini.api_key.as_deref(), GEMINI_API_KEY_ENV, "gemini.api_key")
    }

    pub fn blog_api_key(&self) -> Result<String, PostmillError> {
        require(self.blog.api_key.as_deref(), BLOG_API_KEY_ENV, "blog.api_key")
    }

    pub fn admin_password(&self) -> Result<String, PostmillError> {
        require(
            self.blog.admin_password.as_deref(),
            ADMIN_PASSWORD_ENV,
            "blog.admin_password",
        )
    }

    /// Gateway key, or `None` for open mode.
    pub fn gateway_api_key(&self) -> Option<String> {
        resolve(self.gateway.api_key.as_deref(), GATEWAY_API_KEY_ENV)
    }
}
