// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Best-effort event fanout to connected dashboard subscribers.
//!
//! The [`Broadcaster`] keeps one bounded channel per subscriber. Publishing
//! never blocks the pipeline: a subscriber whose buffer is full simply loses
//! that event, and one whose receiver is gone is evicted on the spot. There
//! is no replay; a subscriber sees only what arrives while it is connected.

use std::sync::Arc;

use courier_core::types::FanoutEvent;
use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Per-subscriber buffer depth. A dashboard that falls this many events
/// behind starts losing them rather than stalling ingestion.
const SUBSCRIBER_BUFFER: usize = 64;

/// Registry of live subscribers.
///
/// Cheap to clone; all clones share the same registry.
#[derive(Clone, Default)]
pub struct Broadcaster {
    subscribers: Arc<DashMap<String, mpsc::Sender<FanoutEvent>>>,
}

/// A live subscription. Dropping it deregisters the subscriber.
pub struct Subscription {
    id: String,
    rx: mpsc::Receiver<FanoutEvent>,
    subscribers: Arc<DashMap<String, mpsc::Sender<FanoutEvent>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber and hand back its event stream.
    pub fn subscribe(&self) -> Subscription {
        let id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        self.subscribers.insert(id.clone(), tx);
        debug!(subscriber_id = %id, "dashboard subscriber registered");
        Subscription {
            id,
            rx,
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Deliver an event to every live subscriber, best effort.
    ///
    /// Slow subscribers lose the event; closed ones are evicted.
    pub fn publish(&self, event: &FanoutEvent) {
        let mut closed = Vec::new();
        for entry in self.subscribers.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(subscriber_id = %entry.key(), "subscriber buffer full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    closed.push(entry.key().clone());
                }
            }
        }
        for id in closed {
            self.subscribers.remove(&id);
            debug!(subscriber_id = %id, "evicted closed subscriber");
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Subscription {
    /// Receive the next event, or `None` once the broadcaster is gone.
    pub async fn recv(&mut self) -> Option<FanoutEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive, for draining in tests.
    pub fn try_recv(&mut self) -> Option<FanoutEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
    }
}
