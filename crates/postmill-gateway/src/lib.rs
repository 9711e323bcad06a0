// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP trigger surface for Postmill.
//!
//! Routes:
//! - `GET /health` (open): status and scheduled jobs
//! - `POST /pipeline`: run one pipeline iteration
//! - `POST /replenish`: add topics to the queue
//! - `POST /reload-schedule`: re-read schedule settings
//!
//! Mutating routes require the `x-api-key` header when a key is configured.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
