// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Courier message relay.

use thiserror::Error;

/// The primary error type used across the webhook pipeline.
///
/// Duplicate webhook deliveries are deliberately absent from this taxonomy:
/// an idempotent replay is a successful no-op, reported through
/// [`crate::types::StoredMessage::inserted`], never an error.
#[derive(Debug, Error)]
pub enum CourierError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A webhook item is missing required normalized fields (user id or
    /// provider message id). The item is skipped; the batch continues.
    #[error("malformed webhook item: {0}")]
    MalformedInput(String),

    /// Persistence layer failure (connection, query, serialization). The
    /// orchestrator degrades to in-memory fanout instead of crashing.
    #[error("storage error: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Remote intent classifier failure (unreachable, non-2xx, undecodable
    /// response). Always resolved into the fixed fallback reply.
    #[error("classifier error: {message}")]
    Classifier {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Outbound channel rejected or failed to deliver a send. Inbound
    /// processing for the same item is never rolled back.
    #[error("delivery failed: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bounded external call exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
