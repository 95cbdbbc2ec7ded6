// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Courier message relay.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Courier configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; secrets (provider token, classifier key) normally arrive through
/// `COURIER_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CourierConfig {
    /// Gateway HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// SQLite storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Messaging provider (WhatsApp Cloud API) settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Remote intent classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Gateway HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// SQLite storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Messaging provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Base URL of the provider's Graph API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Graph API version segment (e.g. "v19.0").
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// The business phone number id sends are issued from.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Bearer token for the send API.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Shared token echoed back during the webhook subscription handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Outbound request timeout in seconds.
    #[serde(default = "default_provider_timeout")]
    pub timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            api_version: default_api_version(),
            phone_number_id: None,
            access_token: None,
            verify_token: None,
            timeout_secs: default_provider_timeout(),
        }
    }
}

/// Remote intent classifier configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Base URL of the classifier service; requests go to `<endpoint>/process`.
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Bearer token for the classifier service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Language hint forwarded with every classification request.
    #[serde(default = "default_language")]
    pub language: String,

    /// Classifier request timeout in seconds.
    #[serde(default = "default_classifier_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            api_key: None,
            language: default_language(),
            timeout_secs: default_classifier_timeout(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_database_path() -> String {
    "courier.db".to_string()
}

fn default_api_base() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_api_version() -> String {
    "v19.0".to_string()
}

fn default_provider_timeout() -> u64 {
    15
}

fn default_classifier_endpoint() -> String {
    "http://localhost:4000".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_classifier_timeout() -> u64 {
    10
}
