// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the WhatsApp Cloud API.
//!
//! Provides [`CloudApiClient`] which handles request construction,
//! authentication, and the two operations the relay needs: sending a text
//! reply and marking an inbound message as read.

use std::time::Duration;

use async_trait::async_trait;
use courier_config::WhatsAppConfig;
use courier_core::traits::OutboundChannel;
use courier_core::types::MessageId;
use courier_core::CourierError;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Response body of a successful send: the provider echoes back the
/// assigned message id(s).
#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    #[serde(default)]
    id: Option<String>,
}

/// HTTP client for Cloud API communication.
///
/// Holds a pooled [`reqwest::Client`] with the bearer token baked into the
/// default headers and a bounded timeout, so a stalled provider never holds
/// the pipeline open indefinitely.
#[derive(Debug, Clone)]
pub struct CloudApiClient {
    client: reqwest::Client,
    base_url: String,
    api_version: String,
    phone_number_id: String,
}

impl CloudApiClient {
    /// Creates a new Cloud API client from the provider config section.
    ///
    /// Fails when the token or phone number id is absent, or when the token
    /// is not a valid header value.
    pub fn new(config: &WhatsAppConfig) -> Result<Self, CourierError> {
        let access_token = config
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CourierError::Config("whatsapp.access_token is not set".to_string()))?;
        let phone_number_id = config
            .phone_number_id
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                CourierError::Config("whatsapp.phone_number_id is not set".to_string())
            })?
            .to_string();

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| CourierError::Config(format!("invalid access token value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert("authorization", auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CourierError::Delivery {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            phone_number_id,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.base_url, self.api_version, self.phone_number_id
        )
    }

    async fn post_payload(
        &self,
        payload: serde_json::Value,
    ) -> Result<reqwest::Response, CourierError> {
        let response = self
            .client
            .post(self.messages_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CourierError::Delivery {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "provider response received");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CourierError::Delivery {
                message: format!("provider returned {status}: {body}"),
                source: None,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl OutboundChannel for CloudApiClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<MessageId, CourierError> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": body,
            },
        });

        let response = self.post_payload(payload).await?;
        let parsed: SendResponse =
            response.json().await.map_err(|e| CourierError::Delivery {
                message: format!("unreadable send response: {e}"),
                source: Some(Box::new(e)),
            })?;

        parsed
            .messages
            .into_iter()
            .find_map(|m| m.id)
            .map(MessageId)
            .ok_or_else(|| CourierError::Delivery {
                message: "send response carried no message id".to_string(),
                source: None,
            })
    }

    async fn mark_as_read(&self, provider_message_id: &str) -> Result<(), CourierError> {
        let payload = json!({
            "messaging_product": "whatsapp",
            "status": "read",
            "message_id": provider_message_id,
        });

        if let Err(e) = self.post_payload(payload).await {
            // Read receipts are cosmetic; the caller decides whether to
            // treat this as fatal (it never does).
            warn!(provider_message_id, error = %e, "mark-as-read failed");
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> WhatsAppConfig {
        WhatsAppConfig {
            access_token: Some("test-token".to_string()),
            phone_number_id: Some("10001".to_string()),
            ..WhatsAppConfig::default()
        }
    }

    #[tokio::test]
    async fn send_text_posts_cloud_api_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v19.0/10001/messages"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(json!({
                "messaging_product": "whatsapp",
                "recipient_type": "individual",
                "to": "1555",
                "type": "text",
                "text": {"preview_url": false, "body": "Hello"},
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "messages": [{"id": "wamid.XYZ"}],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = CloudApiClient::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let id = client.send_text("1555", "Hello").await.unwrap();
        assert_eq!(id.0, "wamid.XYZ");
    }

    #[tokio::test]
    async fn send_text_without_id_in_response_is_a_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"messages": []})))
            .mount(&server)
            .await;

        let client = CloudApiClient::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let err = client.send_text("1555", "Hello").await.unwrap_err();
        assert!(matches!(err, CourierError::Delivery { .. }));
    }

    #[tokio::test]
    async fn provider_error_status_surfaces_as_delivery_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Invalid OAuth access token"},
            })))
            .mount(&server)
            .await;

        let client = CloudApiClient::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        let err = client.send_text("1555", "Hello").await.unwrap_err();
        match err {
            CourierError::Delivery { message, .. } => {
                assert!(message.contains("401"), "message was {message}");
            }
            other => panic!("expected delivery error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn mark_as_read_posts_status_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v19.0/10001/messages"))
            .and(body_partial_json(json!({
                "messaging_product": "whatsapp",
                "status": "read",
                "message_id": "wamid.IN",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = CloudApiClient::new(&test_config())
            .unwrap()
            .with_base_url(server.uri());
        client.mark_as_read("wamid.IN").await.unwrap();
    }

    #[test]
    fn missing_credentials_fail_construction() {
        let mut config = test_config();
        config.access_token = None;
        assert!(matches!(
            CloudApiClient::new(&config),
            Err(CourierError::Config(_))
        ));

        let mut config = test_config();
        config.phone_number_id = Some(String::new());
        assert!(matches!(
            CloudApiClient::new(&config),
            Err(CourierError::Config(_))
        ));
    }
}
