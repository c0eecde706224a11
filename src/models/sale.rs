// SPDX-License-Identifier: MIT

//! Persisted sales report snapshots and the transient line-item shape.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// One /sales/period fetch, stored with the raw matched lines so
/// conciliations can be derived later without re-calling Tecopos.
#[derive(Debug, Clone, FromRow)]
pub struct Sale {
    pub id: i64,
    pub user_id: i64,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub data: serde_json::Value,
    pub total_amount: f64,
    pub total_quantity: f64,
    pub created_at: DateTime<Utc>,
}

/// A normalized report line belonging to the caller's supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleLineItem {
    pub product_id: Option<String>,
    pub product_name: String,
    pub quantity: f64,
    pub amount: f64,
    pub currency: Option<String>,
}

/// Response body for POST /sales/period.
#[derive(Debug, Serialize)]
pub struct SalesPeriodResponse {
    pub sale_id: i64,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub items: Vec<SaleLineItem>,
    pub total_quantity: f64,
    pub total_amount: f64,
}