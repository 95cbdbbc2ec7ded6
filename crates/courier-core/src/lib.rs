// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Courier message relay.
//!
//! This crate provides the canonical event model shared by every stage of
//! the webhook pipeline, the `CourierError` taxonomy, and the trait seams
//! behind which the remote intent classifier and the outbound messaging
//! channel are injected.

pub mod error;
pub mod traits;
pub mod types;

pub use error::CourierError;
pub use traits::{ClassifyRequest, ClassifyResponse, IntentClassifier, OutboundChannel};
pub use types::{
    DeliveryStatus, Direction, FanoutEvent, InboundEvent, Message, MessageId, MessageKind,
    MessageStats, NewMessage, Order, Session, StatusUpdate, StoredMessage,
};
