// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam for the remote intent classification backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CourierError;

/// One classification request: the user's normalized text plus the session
/// context the backend uses to disambiguate follow-up messages.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest {
    pub text: String,
    pub user_id: String,
    pub language: String,
    pub session_data: serde_json::Value,
}

/// The backend's verdict. Every field is optional: a degenerate backend may
/// return only a free-text `response`, or nothing useful at all, and the
/// resolver must still produce a reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub intent: Option<String>,
    /// Intent-specific extracted entities (e.g. `{"orderNumber": "12345"}`).
    #[serde(default)]
    pub entities: serde_json::Value,
    /// Free-text reply suggested by the backend.
    pub response: Option<String>,
    /// Updated session context to write back before replying.
    pub session_data: Option<serde_json::Value>,
}

/// Remote text-in/intent-out capability.
///
/// Implementations must bound the call with a timeout; the resolver treats
/// every error, including [`CourierError::Timeout`], as "use the fallback
/// reply" and never lets it propagate.
#[async_trait]
pub trait IntentClassifier: Send + Sync + 'static {
    async fn classify(&self, request: ClassifyRequest) -> Result<ClassifyResponse, CourierError>;
}
