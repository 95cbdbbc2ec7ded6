// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the remote intent classification service.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::ClassifierConfig;
use courier_core::traits::{ClassifyRequest, ClassifyResponse, IntentClassifier};
use courier_core::CourierError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;

/// Wire form of a classification request. The service speaks camelCase and
/// nests session state under a `context` object alongside the platform tag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    text: &'a str,
    user_id: &'a str,
    language: &'a str,
    context: WireContext<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireContext<'a> {
    platform: &'static str,
    session_data: &'a serde_json::Value,
}

/// Client for the classifier's `POST /process` endpoint.
#[derive(Debug, Clone)]
pub struct ClassifierClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl ClassifierClient {
    pub fn new(config: &ClassifierConfig) -> Result<Self, CourierError> {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        if let Some(api_key) = config.api_key.as_deref().filter(|k| !k.is_empty()) {
            let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| CourierError::Config(format!("invalid classifier api key: {e}")))?;
            auth.set_sensitive(true);
            headers.insert("authorization", auth);
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CourierError::Classifier {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Overrides the endpoint (for testing with wiremock).
    #[cfg(test)]
    pub fn with_endpoint(mut self, url: String) -> Self {
        self.endpoint = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl IntentClassifier for ClassifierClient {
    async fn classify(&self, request: ClassifyRequest) -> Result<ClassifyResponse, CourierError> {
        let wire = WireRequest {
            text: &request.text,
            user_id: &request.user_id,
            language: &request.language,
            context: WireContext {
                platform: "whatsapp",
                session_data: &request.session_data,
            },
        };

        let response = self
            .client
            .post(format!("{}/process", self.endpoint))
            .json(&wire)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CourierError::Timeout {
                        duration: self.timeout,
                    }
                } else {
                    CourierError::Classifier {
                        message: format!("HTTP request failed: {e}"),
                        source: Some(Box::new(e)),
                    }
                }
            })?;

        let status = response.status();
        debug!(status = %status, user_id = %request.user_id, "classifier response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourierError::Classifier {
                message: format!("classifier returned {status}: {body}"),
                source: None,
            });
        }

        response
            .json::<ClassifyResponse>()
            .await
            .map_err(|e| CourierError::Classifier {
                message: format!("undecodable classifier response: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
