// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp Cloud API integration for the Courier message relay.
//!
//! Three provider-facing pieces live here: the serde types for the webhook
//! envelope the provider POSTs at us, the normalizer that maps its
//! heterogeneous message shapes into the canonical [`courier_core::types::InboundEvent`],
//! and the authenticated HTTP client used to dispatch replies.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::CloudApiClient;
pub use normalize::normalize;
pub use types::{ChangeValue, RawMessage, RawStatus, WebhookPayload};
