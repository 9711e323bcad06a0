// SPDX-FileCopyrightText: 2026 Postmill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for the Postmill pipeline.
//!
//! [`with_retry`] runs a fallible async operation up to `max_retries + 1`
//! times. Before each retry it sleeps for the provider's `retryDelay` hint
//! when the error text carries one, or for `base_delay * attempt` otherwise.
//! The last error is returned unchanged.

pub mod retry;

pub use retry::{RetryPolicy, parse_retry_delay, with_retry};
