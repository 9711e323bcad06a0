// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini-backed cover image generation for Postmill.
//!
//! A post's title and excerpt are classified into a mood, a scene template
//! is drawn for that mood, and the generated image is handed to an
//! [`ImageUploader`](postmill_core::ImageUploader) whose URL becomes the cover.

pub mod client;
pub mod image;
pub mod templates;
pub mod types;

pub use client::{GeminiClient, GeneratedImage};
pub use image::CoverImageAgent;
pub use templates::{CoverPlan, Mood, SceneCategory, detect_mood};
