// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams for external collaborators.
//!
//! The pipeline holds both as trait objects so tests can inject doubles and
//! so neither the classifier backend nor the messaging provider leaks into
//! orchestration code.

pub mod classifier;
pub mod outbound;

pub use classifier::{ClassifyRequest, ClassifyResponse, IntentClassifier};
pub use outbound::OutboundChannel;
