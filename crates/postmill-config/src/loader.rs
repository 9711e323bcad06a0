// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./postmill.toml` > `~/.config/postmill/postmill.toml`
//! > `/etc/postmill/postmill.toml` with environment variable overrides via the
//! `POSTMILL_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::PostmillConfig;

/// Config sections that `POSTMILL_<SECTION>_<KEY>` variables may target.
const SECTIONS: &[&str] = &[
    "service", "brand", "openai", "gemini", "blog", "storage", "pipeline", "gateway",
];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/postmill/postmill.toml`
/// 3. `~/.config/postmill/postmill.toml`
/// 4. `./postmill.toml`
/// 5. `POSTMILL_*` environment variables
pub fn load_config() -> Result<PostmillConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PostmillConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PostmillConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PostmillConfig, figment::Error> {
    tracing::debug!(path = %path.display(), "loading configuration file");
    Figment::new()
        .merge(Serialized::defaults(PostmillConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PostmillConfig::default()))
        .merge(Toml::file("/etc/postmill/postmill.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("postmill/postmill.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("postmill.toml"))
        .merge(env_provider())
}

/// Environment provider mapping `POSTMILL_PIPELINE_DRAFT_THRESHOLD` to
/// `pipeline.draft_threshold`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that contain underscores survive intact. Variables that name no
/// section (such as the `POSTMILL_API_KEY` secret) are ignored here.
pub fn env_provider() -> Env {
    Env::prefixed("POSTMILL_")
        .filter(|key| map_env_key(key.as_str()).is_some())
        .map(|key| map_env_key(key.as_str()).unwrap_or_default().into())
}

/// Map a prefix-stripped env var name to a dotted config path.
pub fn map_env_key(key: &str) -> Option<String> {
    let key = key.to_ascii_lowercase();
    SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{section}.{rest}"))
    })
}
