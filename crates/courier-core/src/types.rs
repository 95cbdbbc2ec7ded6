// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Canonical event model shared across the pipeline.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Provider-assigned identifier for a dispatched message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Normalized message kind.
///
/// The provider's media types (`image`, `audio`, `video`, `document`)
/// collapse into [`MessageKind::Media`]; the raw type string survives on
/// [`InboundEvent::raw_type`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Interactive,
    Media,
    Location,
    Unknown,
}

/// Whether a message entered the system from the provider or was sent by us.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Delivery state reported by the provider for a previously sent message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Delivered,
    Read,
    Failed,
}

/// A persisted chat message, inbound or outbound.
///
/// Rows are append-only: `id` is immutable once assigned, `content` and
/// `kind` are write-once, and delivery-state changes arrive as separate
/// [`StatusUpdate`] events rather than mutations of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Store-assigned surrogate key. `0` for the in-memory representation
    /// fanned out when the store is unavailable.
    pub id: i64,
    /// External id assigned by the provider. The dedupe key for inbound
    /// ingestion when present.
    pub provider_message_id: Option<String>,
    pub user_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub direction: Direction,
    /// True when the row carries a locally generated placeholder id or was
    /// never durably recorded at all.
    pub synthetic: bool,
    /// ISO 8601 UTC timestamp; the canonical ordering signal.
    pub created_at: String,
}

/// A message about to be persisted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub provider_message_id: Option<String>,
    pub user_id: String,
    pub content: String,
    pub kind: MessageKind,
    pub direction: Direction,
}

impl NewMessage {
    /// Build the inbound row for a normalized webhook event.
    pub fn inbound(event: &InboundEvent) -> Self {
        Self {
            provider_message_id: Some(event.provider_message_id.clone()),
            user_id: event.user_id.clone(),
            content: event.content.clone(),
            kind: event.kind,
            direction: Direction::Inbound,
        }
    }

    /// Build the outbound row for a dispatched reply.
    pub fn outbound(user_id: &str, content: &str, provider_message_id: Option<String>) -> Self {
        Self {
            provider_message_id,
            user_id: user_id.to_string(),
            content: content.to_string(),
            kind: MessageKind::Text,
            direction: Direction::Outbound,
        }
    }
}

/// Result of an idempotent insert: the row now in the store, plus whether
/// this call created it. A replayed provider retry yields
/// `inserted = false` and must not be fanned out again.
#[derive(Debug, Clone)]
pub struct StoredMessage {
    pub message: Message,
    pub inserted: bool,
}

/// Per-user conversational context carried across messages.
///
/// Exactly zero or one row per `user_id`; writes are full replaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub data: serde_json::Value,
    pub updated_at: String,
}

/// Delivery-status observation for a previously sent message.
///
/// Ephemeral: fanned out to subscribers, never stored durably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub provider_message_id: String,
    pub status: DeliveryStatus,
    pub observed_at: String,
}

/// The normalized form of one provider webhook message, handed from the
/// normalizer to the rest of the pipeline. Transient, never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub provider_message_id: String,
    pub user_id: String,
    pub kind: MessageKind,
    pub content: String,
    /// The provider's original `type` string, kept for logging and for the
    /// `"[<type> message]"` placeholder content.
    pub raw_type: String,
}

/// An order record in the external-facing order registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_number: String,
    pub customer_id: Option<String>,
    pub status: String,
    pub items: serde_json::Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Aggregate counters for the dashboard stats endpoint.
///
/// Invariant: `total_users` counts distinct `user_id` values and is always
/// less than or equal to `total_messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStats {
    pub total_messages: i64,
    pub total_users: i64,
}

/// A real-time event pushed to connected dashboard subscribers.
///
/// Serializes as `{"event": "...", "data": {...}}` with the wire event
/// names `new-message` and `message-status-update`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum FanoutEvent {
    NewMessage(Message),
    #[serde(rename_all = "camelCase")]
    MessageStatusUpdate {
        message_id: String,
        status: DeliveryStatus,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn kind_and_status_round_trip_as_text() {
        for kind in [
            MessageKind::Text,
            MessageKind::Interactive,
            MessageKind::Media,
            MessageKind::Location,
            MessageKind::Unknown,
        ] {
            let s = kind.to_string();
            assert_eq!(MessageKind::from_str(&s).ok(), Some(kind));
        }
        assert_eq!(
            DeliveryStatus::from_str("delivered").ok(),
            Some(DeliveryStatus::Delivered)
        );
        assert_eq!(Direction::Outbound.to_string(), "outbound");
    }

    #[test]
    fn fanout_event_wire_names() {
        let msg = Message {
            id: 1,
            provider_message_id: Some("m1".into()),
            user_id: "1555".into(),
            content: "Hi".into(),
            kind: MessageKind::Text,
            direction: Direction::Inbound,
            synthetic: false,
            created_at: "2026-01-01T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(FanoutEvent::NewMessage(msg)).unwrap();
        assert_eq!(json["event"], "new-message");
        assert_eq!(json["data"]["content"], "Hi");

        let json = serde_json::to_value(FanoutEvent::MessageStatusUpdate {
            message_id: "m1".into(),
            status: DeliveryStatus::Delivered,
        })
        .unwrap();
        assert_eq!(json["event"], "message-status-update");
        assert_eq!(json["data"]["messageId"], "m1");
        assert_eq!(json["data"]["status"], "delivered");
    }

    #[test]
    fn new_message_inbound_carries_event_fields() {
        let event = InboundEvent {
            provider_message_id: "m1".into(),
            user_id: "1555".into(),
            kind: MessageKind::Text,
            content: "Hi".into(),
            raw_type: "text".into(),
        };
        let new = NewMessage::inbound(&event);
        assert_eq!(new.provider_message_id.as_deref(), Some("m1"));
        assert_eq!(new.direction, Direction::Inbound);
        assert_eq!(new.kind, MessageKind::Text);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let stats = MessageStats {
            total_messages: 5,
            total_users: 2,
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalMessages"], 5);
        assert_eq!(json["totalUsers"], 2);
    }
}
