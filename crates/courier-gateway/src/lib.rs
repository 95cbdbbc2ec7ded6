// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP and WebSocket surface for the Courier message relay.
//!
//! The gateway exposes the provider-facing webhook endpoints (handshake and
//! batch ingestion), the dashboard REST API, and the real-time WebSocket
//! feed backed by the fanout broadcaster.

pub mod handlers;
pub mod server;
pub mod ws;

pub use server::{build_router, start_server, GatewayState};
