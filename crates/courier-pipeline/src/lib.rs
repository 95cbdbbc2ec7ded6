// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The webhook processing pipeline.
//!
//! [`Pipeline::process_batch`] walks one provider webhook payload and, for
//! each usable message: normalizes it, persists it idempotently, resolves a
//! reply through the intent classifier, dispatches the reply, and fans both
//! sides of the exchange out to dashboard subscribers. Failures are
//! contained per item; a batch is always consumed to the end so the caller
//! can acknowledge it unconditionally.

use std::str::FromStr;
use std::sync::Arc;

use courier_core::traits::OutboundChannel;
use courier_core::types::{DeliveryStatus, FanoutEvent, Message, NewMessage};
use courier_fanout::Broadcaster;
use courier_intent::Resolver;
use courier_storage::queries::messages;
use courier_storage::Database;
use courier_whatsapp::types::{RawMessage, RawStatus};
use courier_whatsapp::{normalize, WebhookPayload};
use tracing::{debug, info, warn};

/// Outcome counters for one webhook batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Messages that went through the full pipeline.
    pub processed: usize,
    /// Items skipped for missing identifiers or unusable shapes.
    pub malformed: usize,
    /// Replayed deliveries recognized by their provider id and ignored.
    pub duplicates: usize,
    /// Replies the outbound channel failed to deliver.
    pub failed_deliveries: usize,
}

/// Orchestrates the inbound webhook flow end to end.
#[derive(Clone)]
pub struct Pipeline {
    db: Database,
    resolver: Resolver,
    outbound: Arc<dyn OutboundChannel>,
    broadcaster: Broadcaster,
}

impl Pipeline {
    pub fn new(
        db: Database,
        resolver: Resolver,
        outbound: Arc<dyn OutboundChannel>,
        broadcaster: Broadcaster,
    ) -> Self {
        Self {
            db,
            resolver,
            outbound,
            broadcaster,
        }
    }

    /// Process one webhook payload.
    ///
    /// Infallible by design: every per-item failure is contained and
    /// counted, so the webhook endpoint can acknowledge the batch no matter
    /// what happened inside it.
    pub async fn process_batch(&self, payload: &WebhookPayload) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for entry in &payload.entry {
            for change in &entry.changes {
                if change.field != "messages" {
                    debug!(field = %change.field, "skipping non-message change");
                    continue;
                }
                for status in &change.value.statuses {
                    self.handle_status(status, &mut summary).await;
                }
                for message in &change.value.messages {
                    self.handle_message(message, &mut summary).await;
                }
            }
        }

        info!(
            processed = summary.processed,
            malformed = summary.malformed,
            duplicates = summary.duplicates,
            failed_deliveries = summary.failed_deliveries,
            "webhook batch consumed"
        );
        summary
    }

    /// Delivery statuses are ephemeral: verified against the store only as
    /// a debug probe, then pushed straight to subscribers.
    async fn handle_status(&self, status: &RawStatus, summary: &mut BatchSummary) {
        let (Some(id), Some(raw_status)) = (status.id.as_deref(), status.status.as_deref())
        else {
            warn!("status item without id or status, skipping");
            summary.malformed += 1;
            return;
        };
        let Ok(parsed) = DeliveryStatus::from_str(raw_status) else {
            warn!(status = raw_status, "unrecognized delivery status, skipping");
            summary.malformed += 1;
            return;
        };

        match messages::exists_by_provider_id(&self.db, id).await {
            Ok(known) => debug!(provider_message_id = id, known, "status observed"),
            Err(e) => warn!(provider_message_id = id, error = %e, "status store probe failed"),
        }

        self.broadcaster.publish(&FanoutEvent::MessageStatusUpdate {
            message_id: id.to_string(),
            status: parsed,
        });
    }

    async fn handle_message(&self, raw: &RawMessage, summary: &mut BatchSummary) {
        let Some(event) = normalize(raw) else {
            warn!("webhook message without sender or id, skipping");
            summary.malformed += 1;
            return;
        };

        // Read receipt is cosmetic; failure never blocks the pipeline.
        if let Err(e) = self.outbound.mark_as_read(&event.provider_message_id).await {
            debug!(provider_message_id = %event.provider_message_id, error = %e,
                   "mark-as-read failed, continuing");
        }

        let new = NewMessage::inbound(&event);
        let inbound = match messages::insert_if_absent(&self.db, &new).await {
            Ok(stored) => {
                if !stored.inserted {
                    debug!(provider_message_id = %event.provider_message_id,
                           "duplicate delivery, already processed");
                    summary.duplicates += 1;
                    return;
                }
                stored.message
            }
            Err(e) => {
                // Store down: keep the exchange alive on an in-memory
                // representation and push on.
                warn!(error = %e, "store unavailable, degrading to in-memory fanout");
                unpersisted(&new)
            }
        };
        self.broadcaster
            .publish(&FanoutEvent::NewMessage(inbound.clone()));

        let reply = self.resolver.resolve(&event).await;

        match self.outbound.send_text(&event.user_id, &reply).await {
            Ok(message_id) => {
                let new = NewMessage::outbound(&event.user_id, &reply, Some(message_id.0));
                let outbound = match messages::insert_if_absent(&self.db, &new).await {
                    Ok(stored) => stored.message,
                    Err(e) => {
                        warn!(error = %e, "could not persist outbound reply");
                        unpersisted(&new)
                    }
                };
                self.broadcaster
                    .publish(&FanoutEvent::NewMessage(outbound));
            }
            Err(e) => {
                // The inbound side stays processed; delivery failures are
                // never rolled back.
                warn!(user_id = %event.user_id, error = %e, "reply delivery failed");
                summary.failed_deliveries += 1;
            }
        }

        summary.processed += 1;
    }
}

/// The in-memory stand-in for a message the store could not record.
fn unpersisted(new: &NewMessage) -> Message {
    Message {
        id: 0,
        provider_message_id: new.provider_message_id.clone(),
        user_id: new.user_id.clone(),
        content: new.content.clone(),
        kind: new.kind,
        direction: new.direction,
        synthetic: true,
        created_at: chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::types::{Direction, MessageKind};

    #[test]
    fn unpersisted_message_is_marked_synthetic() {
        let new = NewMessage {
            provider_message_id: Some("wamid.X".to_string()),
            user_id: "1555".to_string(),
            content: "hello".to_string(),
            kind: MessageKind::Text,
            direction: Direction::Inbound,
        };
        let msg = unpersisted(&new);
        assert_eq!(msg.id, 0);
        assert!(msg.synthetic);
        assert_eq!(msg.provider_message_id.as_deref(), Some("wamid.X"));
        assert!(msg.created_at.ends_with('Z'));
    }
}
