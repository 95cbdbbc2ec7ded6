// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns a classified inbound message into a concrete reply.
//!
//! The resolver owns the session read/write around classification and the
//! intent dispatch table. It is total: every input, including a dead
//! classifier, produces a reply string.

use std::sync::Arc;

use courier_core::traits::{ClassifyRequest, ClassifyResponse, IntentClassifier};
use courier_core::types::InboundEvent;
use courier_storage::queries::orders::{self, NewOrder};
use courier_storage::queries::sessions;
use courier_storage::Database;
use rand::Rng;
use tracing::{debug, warn};

/// Reply used whenever the classifier call itself fails.
pub const CLASSIFIER_FALLBACK_REPLY: &str =
    "Sorry, I'm having trouble understanding right now. Please try again later.";

/// Resolves inbound events into reply text.
#[derive(Clone)]
pub struct Resolver {
    db: Database,
    classifier: Arc<dyn IntentClassifier>,
    language: String,
}

impl Resolver {
    pub fn new(db: Database, classifier: Arc<dyn IntentClassifier>, language: String) -> Self {
        Self {
            db,
            classifier,
            language,
        }
    }

    /// Produce the reply for one inbound event.
    ///
    /// Classifier failures degrade to [`CLASSIFIER_FALLBACK_REPLY`]; session
    /// store failures degrade to classifying with empty context. This method
    /// returns an error only when intent handling itself needs the store and
    /// cannot reach it.
    pub async fn resolve(&self, event: &InboundEvent) -> String {
        let session_data = match sessions::read_session(&self.db, &event.user_id).await {
            Ok(data) => data,
            Err(e) => {
                warn!(user_id = %event.user_id, error = %e, "session read failed, classifying without context");
                serde_json::json!({})
            }
        };

        let verdict = match self
            .classifier
            .classify(ClassifyRequest {
                text: event.content.clone(),
                user_id: event.user_id.clone(),
                language: self.language.clone(),
                session_data,
            })
            .await
        {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(user_id = %event.user_id, error = %e, "classification failed, using fallback reply");
                return CLASSIFIER_FALLBACK_REPLY.to_string();
            }
        };

        if let Some(updated) = verdict.session_data.as_ref() {
            if let Err(e) = sessions::write_session(&self.db, &event.user_id, updated).await {
                warn!(user_id = %event.user_id, error = %e, "session write-back failed");
            }
        }

        self.dispatch(event, &verdict).await
    }

    async fn dispatch(&self, event: &InboundEvent, verdict: &ClassifyResponse) -> String {
        let Some(intent) = verdict.intent.as_deref() else {
            return verdict.response.clone().unwrap_or_else(|| {
                "I didn't understand that. Can you please try again?".to_string()
            });
        };
        debug!(user_id = %event.user_id, intent, "dispatching intent");

        match intent {
            "greeting" => "Hello! How can I assist you today?".to_string(),
            "thanks" => "You're welcome! Is there anything else I can help with?".to_string(),
            "check_order_status" => self.check_order_status(verdict).await,
            "create_order" => self.create_order(event, verdict).await,
            "general_inquiry" => verdict
                .response
                .clone()
                .unwrap_or_else(|| "How can I help you today?".to_string()),
            other => {
                debug!(intent = other, "no handler for intent");
                verdict
                    .response
                    .clone()
                    .unwrap_or_else(|| "I'm not sure how to help with that.".to_string())
            }
        }
    }

    async fn check_order_status(&self, verdict: &ClassifyResponse) -> String {
        let Some(order_number) = entity_str(verdict, "orderNumber") else {
            return "Please provide your order number so I can check the status.".to_string();
        };

        match orders::get_order_by_number(&self.db, order_number).await {
            Ok(Some(order)) => {
                format!("Your order #{} is currently {}.", order.order_number, order.status)
            }
            Ok(None) => format!(
                "Sorry, I couldn't find order #{order_number}. Please verify the number and try again."
            ),
            Err(e) => {
                warn!(order_number, error = %e, "order lookup failed");
                format!(
                    "Sorry, I couldn't find order #{order_number}. Please verify the number and try again."
                )
            }
        }
    }

    async fn create_order(&self, event: &InboundEvent, verdict: &ClassifyResponse) -> String {
        let items = verdict
            .entities
            .get("items")
            .cloned()
            .unwrap_or_else(|| serde_json::json!([]));
        let new = NewOrder {
            order_number: generate_order_number(),
            customer_id: Some(event.user_id.clone()),
            status: "pending".to_string(),
            items,
        };

        match orders::create_order(&self.db, &new).await {
            Ok(order) => format!(
                "Great! I've created order #{} for you. You'll receive updates on its status.",
                order.order_number
            ),
            Err(e) => {
                warn!(user_id = %event.user_id, error = %e, "order creation failed");
                "Sorry, I couldn't create your order at this time. Please try again later."
                    .to_string()
            }
        }
    }
}

fn entity_str<'a>(verdict: &'a ClassifyResponse, key: &str) -> Option<&'a str> {
    verdict
        .entities
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

/// Human-readable order number: the last six digits of the creation
/// timestamp plus a short random suffix.
fn generate_order_number() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u16 = rand::thread_rng().r#gen();
    format!("ORD-{:06}-{:04x}", millis % 1_000_000, suffix)
}
