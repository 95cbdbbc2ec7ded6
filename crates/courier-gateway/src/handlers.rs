// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the webhook and dashboard REST API.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use courier_core::types::{FanoutEvent, NewMessage};
use courier_core::CourierError;
use courier_storage::queries::messages;
use courier_whatsapp::WebhookPayload;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::server::GatewayState;

/// Subscription object name the provider tags our webhooks with.
const WEBHOOK_OBJECT: &str = "whatsapp_business_account";

/// Default and maximum page size for GET /api/messages.
const DEFAULT_MESSAGE_LIMIT: i64 = 50;
const MAX_MESSAGE_LIMIT: i64 = 200;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn store_error(e: CourierError) -> Response {
    warn!(error = %e, "store-backed endpoint failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "storage unavailable".to_string(),
        }),
    )
        .into_response()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /webhook
///
/// The provider's subscription handshake: echo `hub.challenge` back when
/// `hub.mode` is `subscribe` and `hub.verify_token` matches ours.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    let expected = state.verify_token.as_deref();
    if mode == Some("subscribe") && expected.is_some() && token == expected {
        info!("webhook subscription verified");
        (StatusCode::OK, challenge).into_response()
    } else {
        warn!(?mode, "webhook verification rejected");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST /webhook
///
/// The provider retries any non-2xx response, so once the payload is
/// recognizably ours the batch is always acknowledged with
/// `EVENT_RECEIVED`, whatever happened to individual items inside it.
pub async fn receive_webhook(
    State(state): State<GatewayState>,
    Json(payload): Json<WebhookPayload>,
) -> Response {
    if payload.object.as_deref() != Some(WEBHOOK_OBJECT) {
        return StatusCode::NOT_FOUND.into_response();
    }

    state.pipeline.process_batch(&payload).await;
    (StatusCode::OK, "EVENT_RECEIVED").into_response()
}

/// Query parameters for GET /api/messages.
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// GET /api/messages
pub async fn get_messages(
    State(state): State<GatewayState>,
    Query(query): Query<MessagesQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_MESSAGE_LIMIT)
        .clamp(1, MAX_MESSAGE_LIMIT);

    match messages::list_recent(&state.db, query.user_id.as_deref(), limit).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /api/conversations
///
/// One entry per distinct user: that user's most recent message.
pub async fn get_conversations(State(state): State<GatewayState>) -> Response {
    match messages::latest_per_user(&state.db).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => store_error(e),
    }
}

/// GET /api/stats
pub async fn get_stats(State(state): State<GatewayState>) -> Response {
    match messages::stats(&state.db).await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => store_error(e),
    }
}

/// Request body for POST /api/send.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub message: String,
}

/// Response body for POST /api/send.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,
    pub message_id: String,
    pub recipient: String,
}

/// POST /api/send
///
/// Operator-initiated outbound message, bypassing intent resolution.
pub async fn send_message(
    State(state): State<GatewayState>,
    Json(body): Json<SendRequest>,
) -> Response {
    if body.to.is_empty() || body.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "both 'to' and 'message' are required".to_string(),
            }),
        )
            .into_response();
    }

    let message_id = match state.outbound.send_text(&body.to, &body.message).await {
        Ok(id) => id,
        Err(e) => {
            warn!(to = %body.to, error = %e, "operator send failed");
            return (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: "message delivery failed".to_string(),
                }),
            )
                .into_response();
        }
    };

    // Delivery succeeded; record and fan out best effort.
    let new = NewMessage::outbound(&body.to, &body.message, Some(message_id.0.clone()));
    match messages::insert_if_absent(&state.db, &new).await {
        Ok(stored) => state
            .broadcaster
            .publish(&FanoutEvent::NewMessage(stored.message)),
        Err(e) => warn!(error = %e, "could not persist operator send"),
    }

    Json(SendResponse {
        success: true,
        message_id: message_id.0,
        recipient: body.to,
    })
    .into_response()
}
