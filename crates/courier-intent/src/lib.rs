// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent resolution for the Courier message relay.
//!
//! Two pieces: [`ClassifierClient`], the HTTP client for the remote
//! classification service, and [`Resolver`], which wraps classification with
//! session context and maps the verdict to a reply through the intent
//! dispatch table.

pub mod client;
pub mod resolver;

pub use client::ClassifierClient;
pub use resolver::{Resolver, CLASSIFIER_FALLBACK_REPLY};
