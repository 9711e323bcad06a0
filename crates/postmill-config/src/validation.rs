// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes.

use crate::diagnostic::ConfigError;
use crate::model::PostmillConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects all errors instead of failing fast.
pub fn validate_config(config: &PostmillConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.brand.author.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "brand.author must not be empty".to_string(),
        });
    }

    let pipeline = &config.pipeline;
    if pipeline.auto_publish_threshold > 100 {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.auto_publish_threshold must be at most 100, got {}",
                pipeline.auto_publish_threshold
            ),
        });
    }
    if pipeline.draft_threshold > pipeline.auto_publish_threshold {
        errors.push(ConfigError::Validation {
            message: format!(
                "pipeline.draft_threshold ({}) must not exceed pipeline.auto_publish_threshold ({})",
                pipeline.draft_threshold, pipeline.auto_publish_threshold
            ),
        });
    }
    if pipeline.workers < 1 {
        errors.push(ConfigError::Validation {
            message: "pipeline.workers must be at least 1".to_string(),
        });
    }
    if pipeline.replenish_count < 1 {
        errors.push(ConfigError::Validation {
            message: "pipeline.replenish_count must be at least 1".to_string(),
        });
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    for (key, url) in [
        ("openai.base_url", &config.openai.base_url),
        ("gemini.base_url", &config.gemini.base_url),
        ("blog.api_url", &config.blog.api_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be an http(s) URL, got `{url}`"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&PostmillConfig::default()).is_ok());
    }

    #[test]
    fn inverted_thresholds_fail_validation() {
        let mut config = PostmillConfig::default();
        config.pipeline.draft_threshold = 90;
        config.pipeline.auto_publish_threshold = 80;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "draft_threshold"));
    }

    #[test]
    fn equal_thresholds_are_allowed() {
        let mut config = PostmillConfig::default();
        config.pipeline.draft_threshold = 80;
        config.pipeline.auto_publish_threshold = 80;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_workers_fail_validation() {
        let mut config = PostmillConfig::default();
        config.pipeline.workers = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "workers"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = PostmillConfig::default();
        config.storage.database_path = " ".to_string();
        config.pipeline.auto_publish_threshold = 150;
        config.blog.api_url = "ftp://example".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
