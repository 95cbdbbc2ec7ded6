// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock outbound channel that captures sends instead of dispatching them.

use std::sync::Arc;

use async_trait::async_trait;
use courier_core::traits::OutboundChannel;
use courier_core::types::MessageId;
use courier_core::CourierError;
use tokio::sync::Mutex;

/// One captured send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedSend {
    pub to: String,
    pub body: String,
}

/// A mock outbound channel.
///
/// Successful sends are recorded and assigned a `mock-msg-<uuid>` id. With
/// [`MockOutbound::failing`], every send errors and nothing is recorded as
/// delivered.
pub struct MockOutbound {
    sends: Arc<Mutex<Vec<CapturedSend>>>,
    read_receipts: Arc<Mutex<Vec<String>>>,
    fail_sends: bool,
}

impl MockOutbound {
    pub fn new() -> Self {
        Self {
            sends: Arc::new(Mutex::new(Vec::new())),
            read_receipts: Arc::new(Mutex::new(Vec::new())),
            fail_sends: false,
        }
    }

    /// A channel whose sends always fail with a delivery error.
    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::new()
        }
    }

    /// Sends captured so far, in call order.
    pub async fn sends(&self) -> Vec<CapturedSend> {
        self.sends.lock().await.clone()
    }

    /// Provider message ids marked as read so far.
    pub async fn read_receipts(&self) -> Vec<String> {
        self.read_receipts.lock().await.clone()
    }
}

impl Default for MockOutbound {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutboundChannel for MockOutbound {
    async fn send_text(&self, to: &str, body: &str) -> Result<MessageId, CourierError> {
        if self.fail_sends {
            return Err(CourierError::Delivery {
                message: "mock delivery failure".to_string(),
                source: None,
            });
        }
        self.sends.lock().await.push(CapturedSend {
            to: to.to_string(),
            body: body.to_string(),
        });
        Ok(MessageId(format!("mock-msg-{}", uuid::Uuid::new_v4())))
    }

    async fn mark_as_read(&self, provider_message_id: &str) -> Result<(), CourierError> {
        self.read_receipts
            .lock()
            .await
            .push(provider_message_id.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_sends_with_unique_ids() {
        let mock = MockOutbound::new();
        let first = mock.send_text("1555", "hello").await.unwrap();
        let second = mock.send_text("1556", "world").await.unwrap();
        assert_ne!(first.0, second.0);
        assert!(first.0.starts_with("mock-msg-"));

        let sends = mock.sends().await;
        assert_eq!(sends.len(), 2);
        assert_eq!(sends[0].to, "1555");
        assert_eq!(sends[1].body, "world");
    }

    #[tokio::test]
    async fn failing_channel_records_nothing() {
        let mock = MockOutbound::failing();
        assert!(mock.send_text("1555", "hello").await.is_err());
        assert!(mock.sends().await.is_empty());

        // Read receipts still work; only sends are failed.
        mock.mark_as_read("wamid.X").await.unwrap();
        assert_eq!(mock.read_receipts().await, vec!["wamid.X".to_string()]);
    }
}
