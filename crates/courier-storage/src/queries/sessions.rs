// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user session context: read and full-replace write.

use courier_core::CourierError;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::models::Session;

/// Read a user's session data, defaulting to an empty object when the user
/// has no session yet.
pub async fn read_session(db: &Database, user_id: &str) -> Result<serde_json::Value, CourierError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let raw: Option<String> = conn
                .query_row(
                    "SELECT data FROM sessions WHERE user_id = ?1",
                    params![user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(raw)
        })
        .await
        .map_err(crate::database::map_tr_err)
        .map(|raw| {
            raw.and_then(|s| serde_json::from_str(&s).ok())
                .unwrap_or_else(|| serde_json::json!({}))
        })
}

/// Replace a user's session data wholesale (upsert, no partial merge).
///
/// Last writer wins: two concurrent resolutions for the same user can race
/// between `read_session` and `write_session`, and the one holding the
/// staler read silently overwrites the other. Accepted hazard -- there is
/// deliberately no per-user lock here.
pub async fn write_session(
    db: &Database,
    user_id: &str,
    data: &serde_json::Value,
) -> Result<(), CourierError> {
    let user_id = user_id.to_string();
    let data = data.to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (user_id, data, updated_at)
                 VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                 ON CONFLICT(user_id) DO UPDATE SET
                     data = excluded.data,
                     updated_at = excluded.updated_at",
                params![user_id, data],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Fetch the full session row, if any. Dashboard/debug use.
pub async fn get_session(db: &Database, user_id: &str) -> Result<Option<Session>, CourierError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT user_id, data, updated_at FROM sessions WHERE user_id = ?1",
                    params![user_id],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                        ))
                    },
                )
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(crate::database::map_tr_err)
        .map(|row| {
            row.map(|(user_id, data, updated_at)| Session {
                user_id,
                data: serde_json::from_str(&data).unwrap_or_else(|_| serde_json::json!({})),
                updated_at,
            })
        })
}
