// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.
//!
//! Figment guarantees shape; this module rejects values that parse but
//! cannot work at runtime.

use crate::model::CourierConfig;
use crate::ConfigError;

/// Validate a deserialized config.
///
/// Returns every problem found, not just the first one.
pub fn validate_config(config: &CourierConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.port == 0 {
        errors.push(ConfigError::Invalid {
            key: "server.port".into(),
            reason: "port 0 is not a bindable address".into(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Invalid {
            key: "storage.database_path".into(),
            reason: "database path must not be empty".into(),
        });
    }

    if config.classifier.endpoint.trim().is_empty() {
        errors.push(ConfigError::Invalid {
            key: "classifier.endpoint".into(),
            reason: "classifier endpoint must not be empty".into(),
        });
    } else if !config.classifier.endpoint.starts_with("http://")
        && !config.classifier.endpoint.starts_with("https://")
    {
        errors.push(ConfigError::Invalid {
            key: "classifier.endpoint".into(),
            reason: format!(
                "expected an http(s) URL, got {:?}",
                config.classifier.endpoint
            ),
        });
    }

    if config.classifier.timeout_secs == 0 {
        errors.push(ConfigError::Invalid {
            key: "classifier.timeout_secs".into(),
            reason: "classifier timeout must be at least 1 second".into(),
        });
    }

    if config.whatsapp.timeout_secs == 0 {
        errors.push(ConfigError::Invalid {
            key: "whatsapp.timeout_secs".into(),
            reason: "provider timeout must be at least 1 second".into(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
