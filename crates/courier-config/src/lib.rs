// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Courier message relay.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! let config = courier_config::load_and_validate().expect("config errors");
//! println!("binding {}:{}", config.server.host, config.server.port);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

use thiserror::Error;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{
    ClassifierConfig, CourierConfig, ServerConfig, StorageConfig, WhatsAppConfig,
};

/// A configuration problem, either from extraction or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment failed to read or deserialize the configuration sources.
    #[error("{0}")]
    Extraction(String),

    /// A value deserialized fine but cannot work at runtime.
    #[error("invalid {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: figment extraction first, then
/// post-deserialization validation. Returns every problem found.
#[allow(clippy::result_large_err)]
pub fn load_and_validate() -> Result<CourierConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err
            .into_iter()
            .map(|e| ConfigError::Extraction(e.to_string()))
            .collect()),
    }
}

/// Load configuration from an explicit file path and validate it.
///
/// Used by the `--config` flag; env vars still override the file.
#[allow(clippy::result_large_err)]
pub fn load_and_validate_path(path: &std::path::Path) -> Result<CourierConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err
            .into_iter()
            .map(|e| ConfigError::Extraction(e.to_string()))
            .collect()),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<CourierConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(err
            .into_iter()
            .map(|e| ConfigError::Extraction(e.to_string()))
            .collect()),
    }
}
