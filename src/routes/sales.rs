// SPDX-License-Identifier: MIT

//! Sales retrieval, conciliations and inventory.
//!
//! /sales/period pulls the sold-products report with the stored credential,
//! keeps only the lines belonging to the linked supplier, aggregates them
//! and persists a snapshot. Conciliations are later derived from stored
//! snapshots without calling the platform again.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::inventory::InventoryItem;
use crate::models::sale::SalesPeriodResponse;
use crate::models::Conciliation;
use crate::routes::api::current_user;
use crate::services::resolve::{
    line_belongs_to_supplier, normalize_line, numeric_field, round2, string_field,
    PRODUCT_ID_ALIASES, PRODUCT_NAME_ALIASES, QUANTITY_ALIASES, STOCK_ALIASES,
};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sales/period", post(sales_period))
        .route(
            "/conciliations",
            post(create_conciliation).get(list_conciliations),
        )
        .route("/inventory", get(inventory))
}

// ─── Sales Retrieval ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct SalesPeriodRequest {
    date_from: NaiveDate,
    date_to: NaiveDate,
}

/// Fetch and aggregate the caller's sales for a calendar date range.
async fn sales_period(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SalesPeriodRequest>,
) -> Result<Json<SalesPeriodResponse>> {
    let user = current_user(&state, &auth).await?;

    // Linkage check comes before any credential or remote work.
    let (region, business_id) = user.tecopos_link().ok_or(AppError::NotLinked)?;

    if req.date_from > req.date_to {
        return Err(AppError::BadRequest(
            "date_from must not be after date_to".to_string(),
        ));
    }

    let credential = state
        .db
        .find_credential(user.id, region)
        .await?
        .ok_or_else(|| AppError::MissingCredential(region.to_string()))?;

    let token = state.secrets.decrypt(&credential.access_token_enc)?;

    let report = state
        .tecopos
        .selled_products(region, business_id, &token, req.date_from, req.date_to)
        .await?;

    let supplier_id = user.tecopos_supplier_id.as_deref();
    let fallback_name = user
        .tecopos_supplier_name
        .as_deref()
        .unwrap_or(&user.name);

    let matched: Vec<&Value> = report
        .iter()
        .filter(|line| line_belongs_to_supplier(line, supplier_id, fallback_name))
        .collect();

    let items: Vec<_> = matched.iter().map(|line| normalize_line(line)).collect();
    let total_quantity = round2(items.iter().map(|item| item.quantity).sum());
    let total_amount = round2(items.iter().map(|item| item.amount).sum());

    // Persist the snapshot so conciliations can be derived later.
    let raw_lines = Value::Array(matched.iter().map(|line| (*line).clone()).collect());
    let sale = state
        .db
        .insert_sale(
            user.id,
            req.date_from,
            req.date_to,
            &raw_lines,
            total_amount,
            total_quantity,
        )
        .await?;

    let snapshots: Vec<(String, String, f64)> = matched
        .iter()
        .filter_map(|line| {
            let product_id = string_field(line, PRODUCT_ID_ALIASES)?;
            let name = string_field(line, PRODUCT_NAME_ALIASES).unwrap_or_default();
            Some((product_id, name, numeric_field(line, STOCK_ALIASES)))
        })
        .collect();
    if !snapshots.is_empty() {
        state
            .db
            .insert_inventory_snapshots(user.id, &snapshots)
            .await?;
    }

    tracing::info!(
        user_id = user.id,
        sale_id = sale.id,
        lines = items.len(),
        total_amount,
        "Sales report fetched and stored"
    );

    Ok(Json(SalesPeriodResponse {
        sale_id: sale.id,
        date_from: req.date_from,
        date_to: req.date_to,
        items,
        total_quantity,
        total_amount,
    }))
}

// ─── Conciliations ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ConciliationRequest {
    sale_id: i64,
}

/// Derive a conciliation from a previously stored sale. Orders count the
/// distinct report lines; sample reports carry no discounts.
async fn create_conciliation(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<ConciliationRequest>,
) -> Result<(StatusCode, Json<Conciliation>)> {
    let sale = state
        .db
        .find_sale(auth.user_id, req.sale_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Sale {} not found", req.sale_id)))?;

    let lines = sale.data.as_array().cloned().unwrap_or_default();
    let orders = lines.len() as i32;
    let sales_qty = round2(
        lines
            .iter()
            .map(|line| numeric_field(line, QUANTITY_ALIASES))
            .sum(),
    );
    let revenue = sale.total_amount;
    let discounts = 0.0;
    let total = round2(revenue - discounts);
    let range_label = format!(
        "{} – {}",
        sale.date_from.format("%d %b %Y"),
        sale.date_to.format("%d %b %Y")
    );

    let conciliation = state
        .db
        .insert_conciliation(
            auth.user_id,
            &range_label,
            orders,
            sales_qty,
            revenue,
            discounts,
            total,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(conciliation)))
}

/// All conciliations for the caller, newest first.
async fn list_conciliations(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Conciliation>>> {
    let conciliations = state.db.list_conciliations(auth.user_id).await?;
    Ok(Json(conciliations))
}

// ─── Inventory ───────────────────────────────────────────────

/// Latest snapshot per product for the caller.
async fn inventory(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<InventoryItem>>> {
    let snapshots = state.db.latest_inventory(auth.user_id).await?;

    let items = snapshots
        .into_iter()
        .map(|snapshot| InventoryItem {
            product_id: snapshot.product_id,
            name: snapshot.name,
            total_quantity: snapshot.total_quantity,
        })
        .collect();

    Ok(Json(items))
}
