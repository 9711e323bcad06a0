// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Postmill integration tests.
//!
//! Provides an in-memory [`MemoryStore`] with per-operation failure
//! injection, [`FakeServices`] implementing every generation and publish
//! port from scripted responses, and a [`TestHarness`] that wires both into
//! a [`Pipeline`](postmill_pipeline::Pipeline).

pub mod fakes;
pub mod harness;
pub mod memory_store;

pub use fakes::{FakeServices, Script, sample_draft, sample_revision, sample_suggestion};
pub use harness::{TestHarness, TestHarnessBuilder};
pub use memory_store::{MemoryStore, StoreOp};
