// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Courier integration tests.
//!
//! Provides mock implementations of the two external seams, enabling fast,
//! deterministic, CI-runnable tests without a classifier service or a
//! provider API:
//!
//! - [`MockClassifier`] - scripted [`IntentClassifier`] with failure injection
//! - [`MockOutbound`] - [`OutboundChannel`] that captures sends

pub mod mock_classifier;
pub mod mock_outbound;

pub use mock_classifier::MockClassifier;
pub use mock_outbound::MockOutbound;
