// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wiring for the `postmill` binary.
//!
//! [`app`] builds the store, provider clients, and pipeline from a loaded
//! configuration; [`commands`] implements each CLI subcommand; [`serve`]
//! runs the scheduler and HTTP gateway until a shutdown signal arrives.

pub mod app;
pub mod commands;
pub mod serve;
pub mod shutdown;
