// SPDX-License-Identifier: MIT

//! Conciliation summaries derived from stored sales.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Reconciliation record for one stored sale.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conciliation {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: i64,
    pub range_label: String,
    pub orders: i32,
    pub sales_qty: f64,
    pub revenue: f64,
    pub discounts: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}