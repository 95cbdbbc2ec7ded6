// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use courier_core::traits::OutboundChannel;
use courier_core::CourierError;
use courier_fanout::Broadcaster;
use courier_pipeline::Pipeline;
use courier_storage::Database;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// Store handle for the dashboard read endpoints.
    pub db: Database,
    /// The webhook processing pipeline.
    pub pipeline: Pipeline,
    /// Outbound channel for operator-initiated sends.
    pub outbound: Arc<dyn OutboundChannel>,
    /// Fanout registry backing the WebSocket endpoint.
    pub broadcaster: Broadcaster,
    /// Shared secret for the webhook subscription handshake.
    pub verify_token: Option<String>,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Build the gateway router. Split out of [`start_server`] so tests can
/// drive it with `tower::ServiceExt::oneshot`.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route(
            "/webhook",
            get(handlers::verify_webhook).post(handlers::receive_webhook),
        )
        .route("/api/messages", get(handlers::get_messages))
        .route("/api/conversations", get(handlers::get_conversations))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/send", post(handlers::send_message))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the gateway HTTP/WebSocket server.
///
/// Binds to the configured host:port and serves until the process exits.
pub async fn start_server(host: &str, port: u16, state: GatewayState) -> Result<(), CourierError> {
    let app = build_router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CourierError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CourierError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
