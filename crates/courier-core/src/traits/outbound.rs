// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam for the outbound messaging channel.

use async_trait::async_trait;

use crate::error::CourierError;
use crate::types::MessageId;

/// The external messaging channel replies are dispatched through.
#[async_trait]
pub trait OutboundChannel: Send + Sync + 'static {
    /// Send a plain-text message, returning the provider-assigned id.
    ///
    /// Failures surface as [`CourierError::Delivery`]; by the time the
    /// orchestrator sees one, the inbound half of the item is already
    /// persisted and fanned out and stays that way.
    async fn send_text(&self, to: &str, body: &str) -> Result<MessageId, CourierError>;

    /// Mark an inbound message as read on the provider side. Best-effort:
    /// callers log failures and move on.
    async fn mark_as_read(&self, provider_message_id: &str) -> Result<(), CourierError>;
}
