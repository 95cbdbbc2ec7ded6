// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serde types for the provider's webhook envelope.
//!
//! Every field is optional or defaulted: the provider's payloads are
//! duck-typed and the normalizer, not deserialization, decides what is
//! usable. A shape we don't recognize must still deserialize.

use serde::Deserialize;

/// Top-level webhook batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    /// Subscription object name; anything but `whatsapp_business_account`
    /// is not ours.
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub entry: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub changes: Vec<Change>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Change {
    /// Only changes with `field == "messages"` carry pipeline work.
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub value: ChangeValue,
}

/// The message/status body of one change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangeValue {
    #[serde(default)]
    pub messages: Vec<RawMessage>,
    #[serde(default)]
    pub statuses: Vec<RawStatus>,
    /// Contact metadata the provider attaches; accepted, not consumed.
    #[serde(default)]
    pub contacts: serde_json::Value,
}

/// One inbound message exactly as the provider shaped it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMessage {
    /// Provider message id; required for ingestion.
    #[serde(default)]
    pub id: Option<String>,
    /// Sender identifier; required for ingestion.
    #[serde(default)]
    pub from: Option<String>,
    #[serde(rename = "type", default)]
    pub message_type: Option<String>,
    #[serde(default)]
    pub text: Option<TextPayload>,
    #[serde(default)]
    pub interactive: Option<InteractivePayload>,
    #[serde(default)]
    pub image: Option<MediaPayload>,
    #[serde(default)]
    pub audio: Option<MediaPayload>,
    #[serde(default)]
    pub video: Option<MediaPayload>,
    #[serde(default)]
    pub document: Option<MediaPayload>,
    #[serde(default)]
    pub location: Option<LocationPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TextPayload {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InteractivePayload {
    #[serde(rename = "type", default)]
    pub interactive_type: Option<String>,
    #[serde(default)]
    pub button_reply: Option<ReplyPayload>,
    #[serde(default)]
    pub list_reply: Option<ReplyPayload>,
}

/// A button or list selection; `id` is the developer-assigned key,
/// `title` the human-visible label we ingest as content.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReplyPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaPayload {
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationPayload {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One delivery-status observation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStatus {
    /// Provider id of the message the status refers to.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RawMessage {
    /// The media payload matching the message's own type, if it is one of
    /// the four media kinds.
    pub fn media_payload(&self) -> Option<&MediaPayload> {
        match self.message_type.as_deref() {
            Some("image") => self.image.as_ref(),
            Some("audio") => self.audio.as_ref(),
            Some("video") => self.video.as_ref(),
            Some("document") => self.document.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_envelope_deserializes() {
        let json = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "changes": [{
                    "field": "messages",
                    "value": {
                        "contacts": [{"profile": {"name": "Alice"}, "wa_id": "1555"}],
                        "messages": [{
                            "id": "m1",
                            "from": "1555",
                            "type": "text",
                            "text": {"body": "Hi"}
                        }],
                        "statuses": [{"id": "m0", "status": "delivered"}]
                    }
                }]
            }]
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.object.as_deref(), Some("whatsapp_business_account"));
        let value = &payload.entry[0].changes[0].value;
        assert_eq!(value.messages.len(), 1);
        assert_eq!(value.statuses.len(), 1);
        assert_eq!(value.messages[0].from.as_deref(), Some("1555"));
    }

    #[test]
    fn unknown_shapes_still_deserialize() {
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"entry": [{"changes": [{"value": {}}]}]}"#).unwrap();
        assert!(payload.object.is_none());
        assert!(payload.entry[0].changes[0].value.messages.is_empty());

        let msg: RawMessage =
            serde_json::from_str(r#"{"id": "m9", "from": "1555", "type": "sticker"}"#).unwrap();
        assert_eq!(msg.message_type.as_deref(), Some("sticker"));
        assert!(msg.media_payload().is_none());
    }

    #[test]
    fn media_payload_follows_type() {
        let msg: RawMessage = serde_json::from_str(
            r#"{"id": "m1", "from": "1555", "type": "image",
                "image": {"caption": "sunset"}}"#,
        )
        .unwrap();
        assert_eq!(
            msg.media_payload().and_then(|m| m.caption.as_deref()),
            Some("sunset")
        );
    }
}
