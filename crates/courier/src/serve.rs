// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `courier serve` command implementation.
//!
//! Wires the full relay together: SQLite store, Cloud API client,
//! classifier client, resolver, pipeline, fanout broadcaster, and the
//! gateway HTTP/WebSocket server.

use std::sync::Arc;

use courier_config::CourierConfig;
use courier_core::CourierError;
use courier_fanout::Broadcaster;
use courier_gateway::GatewayState;
use courier_intent::{ClassifierClient, Resolver};
use courier_pipeline::Pipeline;
use courier_storage::Database;
use courier_whatsapp::CloudApiClient;
use tracing::info;

/// Runs the `courier serve` command.
pub async fn run_serve(config: CourierConfig) -> Result<(), CourierError> {
    init_tracing();

    info!("starting courier serve");

    let db = Database::open(&config.storage.database_path).await?;
    info!(path = %config.storage.database_path, "store opened");

    let outbound = Arc::new(CloudApiClient::new(&config.whatsapp)?);
    let classifier = Arc::new(ClassifierClient::new(&config.classifier)?);
    let resolver = Resolver::new(db.clone(), classifier, config.classifier.language.clone());
    let broadcaster = Broadcaster::new();
    let pipeline = Pipeline::new(
        db.clone(),
        resolver,
        outbound.clone(),
        broadcaster.clone(),
    );

    let state = GatewayState {
        db,
        pipeline,
        outbound,
        broadcaster,
        verify_token: config.whatsapp.verify_token.clone(),
        start_time: std::time::Instant::now(),
    };

    courier_gateway::start_server(&config.server.host, config.server.port, state).await
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("courier=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
