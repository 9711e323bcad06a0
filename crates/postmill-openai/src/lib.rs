// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-generation ports backed by an OpenAI-compatible chat completions API.
//!
//! One shared [`OpenAiClient`] drives three ports: [`ContentWriter`]
//! (first draft), [`RevisionAgent`] (checklist audit and rewrite), and
//! [`TopicAgent`] (queue replenishment ideas). Each requests JSON-object
//! output and validates every required field before returning.

pub mod client;
pub mod content;
pub mod prompts;
pub mod revision;
pub mod topic;
pub mod types;
pub mod validate;

pub use client::OpenAiClient;
pub use content::ContentWriter;
pub use revision::RevisionAgent;
pub use topic::TopicAgent;
