// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Normalization of provider message shapes into the canonical event model.

use courier_core::types::{InboundEvent, MessageKind};
use tracing::warn;

use crate::types::RawMessage;

/// Map one provider message into an [`InboundEvent`].
///
/// Returns `None` when the message lacks a sender or a provider id; the
/// orchestrator skips such items and counts them as malformed. Every
/// recognizable shape yields non-empty content; unrecognized types become
/// [`MessageKind::Unknown`] with a `"[<type> message]"` placeholder and a
/// warning, never a failure.
pub fn normalize(msg: &RawMessage) -> Option<InboundEvent> {
    let user_id = msg.from.as_deref().filter(|s| !s.is_empty())?.to_string();
    let provider_message_id = msg.id.as_deref().filter(|s| !s.is_empty())?.to_string();

    let raw_type = msg.message_type.as_deref().unwrap_or("unknown").to_string();

    let (kind, content) = match raw_type.as_str() {
        "text" => {
            let body = msg
                .text
                .as_ref()
                .and_then(|t| t.body.clone())
                .filter(|b| !b.is_empty())
                .unwrap_or_else(|| "[text message]".to_string());
            (MessageKind::Text, body)
        }
        "interactive" => (MessageKind::Interactive, interactive_content(msg)),
        "image" | "audio" | "video" | "document" => {
            let content = msg
                .media_payload()
                .and_then(|m| m.caption.clone())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| format!("[{raw_type} message]"));
            (MessageKind::Media, content)
        }
        "location" => (MessageKind::Location, location_content(msg)),
        other => {
            warn!(
                message_type = other,
                provider_message_id, "unrecognized message type, ingesting as unknown"
            );
            (MessageKind::Unknown, format!("[{other} message]"))
        }
    };

    Some(InboundEvent {
        provider_message_id,
        user_id,
        kind,
        content,
        raw_type,
    })
}

fn interactive_content(msg: &RawMessage) -> String {
    let Some(interactive) = msg.interactive.as_ref() else {
        return "[interactive message]".to_string();
    };
    if let Some(title) = interactive
        .button_reply
        .as_ref()
        .and_then(|r| r.title.clone())
    {
        return title;
    }
    if let Some(title) = interactive
        .list_reply
        .as_ref()
        .and_then(|r| r.title.clone())
    {
        return title;
    }
    let subtype = interactive.interactive_type.as_deref().unwrap_or("unknown");
    format!("[interactive {subtype} message]")
}

fn location_content(msg: &RawMessage) -> String {
    let Some(location) = msg.location.as_ref() else {
        return "[location message]".to_string();
    };
    // Missing name/address render as empty strings, matching the provider's
    // own omission rather than inventing placeholders.
    let name = location.name.as_deref().unwrap_or("");
    let address = location.address.as_deref().unwrap_or("");
    let lat = location.latitude.unwrap_or(0.0);
    let lon = location.longitude.unwrap_or(0.0);
    format!("Location: {name} {address} ({lat}, {lon})")
}
