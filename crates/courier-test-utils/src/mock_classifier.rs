// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock intent classifier for deterministic testing.
//!
//! Verdicts are popped from a FIFO queue. When the queue is empty the mock
//! falls back to its default behavior: a bare verdict with no intent, or a
//! classifier error when constructed with [`MockClassifier::failing`].

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use courier_core::traits::{ClassifyRequest, ClassifyResponse, IntentClassifier};
use courier_core::CourierError;
use tokio::sync::Mutex;

type ScriptedVerdict = Result<ClassifyResponse, CourierError>;

/// A mock classifier that returns pre-configured verdicts.
pub struct MockClassifier {
    script: Arc<Mutex<VecDeque<ScriptedVerdict>>>,
    fail_when_empty: bool,
    requests: Arc<Mutex<Vec<ClassifyRequest>>>,
}

impl MockClassifier {
    /// A classifier whose queue is empty; every call yields a default
    /// (intent-less) verdict.
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fail_when_empty: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Pre-load a sequence of verdicts, consumed in order.
    pub fn scripted(verdicts: Vec<ScriptedVerdict>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::from(verdicts))),
            fail_when_empty: false,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer with the given intent and no entities.
    pub fn with_intent(intent: &str) -> Self {
        let verdict = ClassifyResponse {
            intent: Some(intent.to_string()),
            ..ClassifyResponse::default()
        };
        // An effectively infinite supply of the same verdict.
        Self::scripted(std::iter::repeat_with(|| Ok(verdict.clone())).take(64).collect())
    }

    /// Every call fails with a classifier error.
    pub fn failing() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fail_when_empty: true,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Requests seen so far, in call order.
    pub async fn requests(&self) -> Vec<ClassifyRequest> {
        self.requests.lock().await.clone()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IntentClassifier for MockClassifier {
    async fn classify(&self, request: ClassifyRequest) -> Result<ClassifyResponse, CourierError> {
        self.requests.lock().await.push(request);
        if let Some(verdict) = self.script.lock().await.pop_front() {
            return verdict;
        }
        if self.fail_when_empty {
            return Err(CourierError::Classifier {
                message: "mock classifier failure".to_string(),
                source: None,
            });
        }
        Ok(ClassifyResponse::default())
    }
}
