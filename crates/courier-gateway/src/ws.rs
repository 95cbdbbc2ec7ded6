// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket endpoint for dashboard subscribers.
//!
//! Push-only: the server streams pipeline events as JSON frames and ignores
//! everything the client sends except close. Wire shapes:
//!
//! ```json
//! {"event": "new-message", "data": {"id": 7, "content": "...", ...}}
//! {"event": "message-status-update", "data": {"messageId": "...", "status": "delivered"}}
//! ```

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};

use crate::server::GatewayState;

/// WebSocket upgrade handler.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<GatewayState>) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection.
///
/// Subscribes to the broadcaster, forwards events until either side closes,
/// and deregisters on the way out (the subscription's drop handles that).
async fn handle_socket(socket: WebSocket, state: GatewayState) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let mut subscription = state.broadcaster.subscribe();

    let forwarder = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let frame = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    tracing::warn!(error = %e, "unserializable fanout event, dropping");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    // Drain the client side; inbound frames carry no meaning here.
    while let Some(Ok(msg)) = ws_receiver.next().await {
        if let Message::Close(_) = msg {
            break;
        }
    }

    forwarder.abort();
}
