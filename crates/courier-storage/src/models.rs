// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `courier-core::types` so the whole
//! pipeline shares them. This module re-exports them for convenience within
//! the storage crate.

pub use courier_core::types::{
    Direction, Message, MessageKind, MessageStats, NewMessage, Order, Session, StoredMessage,
};
