// SPDX-License-Identifier: MIT

//! Inventory snapshots written after each sales fetch.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Point-in-time stock level for one product.
#[derive(Debug, Clone, FromRow)]
pub struct InventorySnapshot {
    pub id: i64,
    pub user_id: i64,
    pub product_id: String,
    pub name: String,
    pub total_quantity: f64,
    pub created_at: DateTime<Utc>,
}

/// Latest known quantity per product, as returned by GET /inventory.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub product_id: String,
    pub name: String,
    pub total_quantity: f64,
}