// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the brand blog's content API.
//!
//! [`BlogClient`] implements both halves of the publish port: post creation
//! ([`PostPublisher`](postmill_core::PostPublisher)) and cover image upload
//! ([`ImageUploader`](postmill_core::ImageUploader)).

pub mod client;
pub mod types;

pub use client::{BlogClient, upload_filename};
