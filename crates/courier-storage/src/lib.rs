// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Courier message relay.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a
//! single-writer concurrency model via `tokio-rusqlite`, and typed query
//! modules for the message log, per-user sessions, and the order registry.
//!
//! The one load-bearing guarantee lives in
//! [`queries::messages::insert_if_absent`]: the check-and-insert on
//! `provider_message_id` runs inside a single call on the writer thread,
//! which is what makes provider webhook retries safe to replay.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
