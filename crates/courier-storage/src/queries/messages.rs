// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message log operations: idempotent insert, dashboard reads, stats.

use courier_core::CourierError;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::models::{Direction, Message, MessageKind, MessageStats, NewMessage, StoredMessage};

const MESSAGE_COLUMNS: &str =
    "id, provider_message_id, user_id, content, kind, direction, synthetic, created_at";

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let kind: String = row.get(4)?;
    let direction: String = row.get(5)?;
    Ok(Message {
        id: row.get(0)?,
        provider_message_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        // Rows are only ever written by this module; anything unparseable
        // is treated as the unknown kind rather than failing the read.
        kind: kind.parse().unwrap_or(MessageKind::Unknown),
        direction: if direction == "outbound" {
            Direction::Outbound
        } else {
            Direction::Inbound
        },
        synthetic: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Atomic check-and-insert keyed by `provider_message_id`.
///
/// If a row with the key already exists it is returned unchanged with
/// `inserted = false` -- a replayed provider retry never duplicates a row
/// and the caller must not fan it out again. A message without a provider
/// id gets a generated `local-<uuid>` placeholder and `synthetic = 1`.
///
/// The select and insert run inside one transaction on the single writer
/// thread, so concurrent callers cannot interleave between check and insert.
pub async fn insert_if_absent(
    db: &Database,
    new: &NewMessage,
) -> Result<StoredMessage, CourierError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            let (key, synthetic) = match &new.provider_message_id {
                Some(id) => (id.clone(), false),
                None => (format!("local-{}", uuid::Uuid::new_v4()), true),
            };

            let tx = conn.transaction()?;

            let existing = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages WHERE provider_message_id = ?1"
                ))?;
                stmt.query_row(params![key], row_to_message).optional()?
            };
            if let Some(message) = existing {
                tx.commit()?;
                return Ok(StoredMessage {
                    message,
                    inserted: false,
                });
            }

            tx.execute(
                "INSERT INTO messages (provider_message_id, user_id, content, kind, direction, synthetic)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    key,
                    new.user_id,
                    new.content,
                    new.kind.to_string(),
                    new.direction.to_string(),
                    synthetic,
                ],
            )?;
            let id = tx.last_insert_rowid();

            let message = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = ?1"
                ))?;
                stmt.query_row(params![id], row_to_message)?
            };
            tx.commit()?;

            Ok(StoredMessage {
                message,
                inserted: true,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Recent messages, newest first, optionally filtered by user.
pub async fn list_recent(
    db: &Database,
    user_id: Option<&str>,
    limit: i64,
) -> Result<Vec<Message>, CourierError> {
    let user_id = user_id.map(|u| u.to_string());
    db.connection()
        .call(move |conn| {
            let mut messages = Vec::new();
            match &user_id {
                Some(user) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {MESSAGE_COLUMNS} FROM messages
                         WHERE user_id = ?1
                         ORDER BY created_at DESC, id DESC LIMIT ?2"
                    ))?;
                    let rows = stmt.query_map(params![user, limit], row_to_message)?;
                    for row in rows {
                        messages.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {MESSAGE_COLUMNS} FROM messages
                         ORDER BY created_at DESC, id DESC LIMIT ?1"
                    ))?;
                    let rows = stmt.query_map(params![limit], row_to_message)?;
                    for row in rows {
                        messages.push(row?);
                    }
                }
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// The conversation-thread view: for each distinct user, only that user's
/// most recent message. Equal timestamps tie-break on the higher row id.
pub async fn latest_per_user(db: &Database) -> Result<Vec<Message>, CourierError> {
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM (
                     SELECT *, ROW_NUMBER() OVER (
                         PARTITION BY user_id
                         ORDER BY created_at DESC, id DESC
                     ) AS rn
                     FROM messages
                 )
                 WHERE rn = 1
                 ORDER BY created_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map([], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Whether any stored message carries this provider id. Used by the status
/// pass-through path as its lightweight store touch.
pub async fn exists_by_provider_id(db: &Database, id: &str) -> Result<bool, CourierError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT id FROM messages WHERE provider_message_id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Aggregate counters over the whole log.
pub async fn stats(db: &Database) -> Result<MessageStats, CourierError> {
    db.connection()
        .call(|conn| {
            let stats = conn.query_row(
                "SELECT COUNT(*), COUNT(DISTINCT user_id) FROM messages",
                [],
                |row| {
                    Ok(MessageStats {
                        total_messages: row.get(0)?,
                        total_users: row.get(1)?,
                    })
                },
            )?;
            Ok(stats)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
