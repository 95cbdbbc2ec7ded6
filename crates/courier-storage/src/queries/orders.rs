// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order registry operations used by the intent resolver.

use courier_core::CourierError;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::models::Order;

/// An order to be created; the store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_id: Option<String>,
    pub status: String,
    pub items: serde_json::Value,
}

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<Order> {
    let items: String = row.get(4)?;
    Ok(Order {
        id: row.get(0)?,
        order_number: row.get(1)?,
        customer_id: row.get(2)?,
        status: row.get(3)?,
        items: serde_json::from_str(&items).unwrap_or_else(|_| serde_json::json!([])),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const ORDER_COLUMNS: &str =
    "id, order_number, customer_id, status, items, created_at, updated_at";

/// Look up an order by its human-readable number.
pub async fn get_order_by_number(
    db: &Database,
    order_number: &str,
) -> Result<Option<Order>, CourierError> {
    let order_number = order_number.to_string();
    db.connection()
        .call(move |conn| {
            let order = conn
                .query_row(
                    &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?1"),
                    params![order_number],
                    row_to_order,
                )
                .optional()?;
            Ok(order)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a new order and return the stored row.
pub async fn create_order(db: &Database, new: &NewOrder) -> Result<Order, CourierError> {
    let new = new.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders (order_number, customer_id, status, items)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    new.order_number,
                    new.customer_id,
                    new.status,
                    new.items.to_string(),
                ],
            )?;
            let id = conn.last_insert_rowid();
            let order = conn.query_row(
                &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
                params![id],
                row_to_order,
            )?;
            Ok(order)
        })
        .await
        .map_err(crate::database::map_tr_err)
}
