// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pre-shared key check for mutating routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// Header carrying the pre-shared key.
pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected key. `None` leaves the routes open.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl AuthConfig {
    pub fn is_open(&self) -> bool {
        self.api_key.is_none()
    }
}

/// Rejects requests whose `x-api-key` does not match; passes all requests
/// through when no key is configured.
pub async fn api_key_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = auth.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided == Some(expected) {
        Ok(next.run(request).await)
    } else {
        tracing::debug!(path = %request.uri().path(), "rejected request with missing or wrong API key");
        Err(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_key() {
        let config = AuthConfig {
            api_key: Some("secret-key".into()),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("[redacted]"));
        assert!(!config.is_open());
        assert!(AuthConfig::default().is_open());
    }
}
