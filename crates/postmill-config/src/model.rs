// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Postmill pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Postmill configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PostmillConfig {
    #[serde(default)]
    pub service: ServiceConfig,

    /// Publishing identity.
    #[serde(default)]
    pub brand: BrandConfig,

    /// Text generation service.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Image generation service.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Blog content API and image upload endpoint.
    #[serde(default)]
    pub blog: BlogConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Orchestrator thresholds, retry policy, and replenishment.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP trigger surface.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Process-level settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "postmill".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BrandConfig {
    /// Author name attached to every post.
    #[serde(default = "default_author")]
    pub author: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            author: default_author(),
        }
    }
}

fn default_author() -> String {
    "Jesse A. Eisenbalm".to_string()
}

/// OpenAI-compatible chat completions settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to `OPENAI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_generation_timeout() -> u64 {
    120
}

/// Gemini image generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            image_model: default_image_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_generation_timeout(),
        }
    }
}

fn default_image_model() -> String {
    "gemini-2.0-flash-preview-image-generation".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Blog content API settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlogConfig {
    #[serde(default = "default_blog_api_url")]
    pub api_url: String,

    /// Create-post credential. `None` falls back to `BLOG_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Upload credential. `None` falls back to `ADMIN_PASSWORD`.
    #[serde(default)]
    pub admin_password: Option<String>,

    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,

    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            api_url: default_blog_api_url(),
            api_key: None,
            admin_password: None,
            publish_timeout_secs: default_publish_timeout(),
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

fn default_blog_api_url() -> String {
    "https://jesse-eisenbalm-server.vercel.app".to_string()
}

fn default_publish_timeout() -> u64 {
    30
}

fn default_upload_timeout() -> u64 {
    60
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|d| d.join("postmill").join("postmill.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("postmill.db"))
        .to_string_lossy()
        .to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Orchestrator settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Scores below this are held back.
    #[serde(default = "default_draft_threshold")]
    pub draft_threshold: u32,

    /// Scores at or above this are published publicly.
    #[serde(default = "default_auto_publish_threshold")]
    pub auto_publish_threshold: u32,

    /// Extra attempts after the first for each external call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Pending count below which a run triggers replenishment.
    #[serde(default = "default_replenish_threshold")]
    pub replenish_threshold: u64,

    /// Topics requested per replenishment.
    #[serde(default = "default_replenish_count")]
    pub replenish_count: usize,

    /// Concurrent pipeline/replenish tasks.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            draft_threshold: default_draft_threshold(),
            auto_publish_threshold: default_auto_publish_threshold(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            replenish_threshold: default_replenish_threshold(),
            replenish_count: default_replenish_count(),
            workers: default_workers(),
        }
    }
}

fn default_draft_threshold() -> u32 {
    70
}

fn default_auto_publish_threshold() -> u32 {
    85
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_replenish_threshold() -> u64 {
    6
}

fn default_replenish_count() -> usize {
    15
}

fn default_workers() -> usize {
    2
}

/// HTTP trigger surface settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared key for mutating routes. `None` falls back to
    /// `POSTMILL_API_KEY`; if that is unset too, routes are open.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}
