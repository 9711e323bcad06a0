// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Port definitions for the external collaborators of the pipeline.
//!
//! Every port uses `#[async_trait]` so implementations can be held as
//! `Arc<dyn Trait>` and swapped for fakes in tests.

pub mod generation;
pub mod publish;
pub mod store;

pub use generation::{CoverImageProducer, DraftReviser, DraftWriter, TopicSource};
pub use publish::{ImageUploader, PostPublisher};
pub use store::QueueStore;
