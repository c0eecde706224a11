// SPDX-License-Identifier: MIT

//! Tecopos linking workflow.
//!
//! Two steps, in order: save-token validates a bearer token against the
//! platform, resolves the declared business name and stores the token
//! encrypted; link-supplier then resolves the caller's supplier identity
//! inside that business. Supplier linkage always requires the business
//! linkage to exist first.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::routes::api::current_user;
use crate::services::resolve::{
    resolve_unique, string_field, BUSINESS_ID_ALIASES, BUSINESS_NAME_ALIASES, SUPPLIER_ID_ALIASES,
    SUPPLIER_NAME_ALIASES,
};
use crate::services::tecopos::is_supported_region;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me/tecopos/save-token", post(save_token))
        .route("/me/link-tecopos-supplier", post(link_supplier))
}

// ─── Business Linking ────────────────────────────────────────

#[derive(Deserialize)]
pub struct SaveTokenRequest {
    region: String,
    business_name: String,
    access_token: String,
}

/// Masked confirmation; the token is never echoed back.
#[derive(Serialize)]
pub struct SaveTokenResponse {
    pub region: String,
    pub business_name: String,
    pub has_token: bool,
}

/// Validate a Tecopos token, resolve the declared business and store the
/// encrypted credential.
async fn save_token(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SaveTokenRequest>,
) -> Result<Json<SaveTokenResponse>> {
    let region = req.region.trim().to_string();
    if !is_supported_region(&region) {
        return Err(AppError::InvalidRegion(region));
    }
    if req.access_token.is_empty() {
        return Err(AppError::BadRequest(
            "access_token must not be empty".to_string(),
        ));
    }

    // Listing businesses is the only validation the token gets. The API
    // reports a single error either way, but a remote outage is not a bad
    // token, so keep the distinction in the logs.
    let businesses = match state.tecopos.list_businesses(&region, &req.access_token).await {
        Ok(businesses) => businesses,
        Err(err) => {
            tracing::warn!(
                user_id = auth.user_id,
                region = %region,
                error = %err,
                "Token validation call failed (invalid token or remote outage)"
            );
            return Err(AppError::InvalidCredential(format!(
                "the platform did not accept the token for region {}",
                region
            )));
        }
    };

    let business = resolve_unique(&req.business_name, &businesses, BUSINESS_NAME_ALIASES)
        .map_err(|candidates| AppError::AmbiguousOrNotFound {
            entity: "business",
            candidates,
        })?;

    let business_id = string_field(business, BUSINESS_ID_ALIASES).ok_or_else(|| {
        AppError::MalformedRemoteResponse("business record has no usable id field".to_string())
    })?;
    let business_name = string_field(business, BUSINESS_NAME_ALIASES)
        .unwrap_or_else(|| req.business_name.trim().to_string());

    let encrypted = state.secrets.encrypt(&req.access_token)?;
    state
        .db
        .upsert_credential(auth.user_id, &region, &encrypted)
        .await?;

    // Only business-level fields change here; an existing supplier linkage
    // is left alone so re-saving a token does not force re-linking.
    state
        .db
        .set_business_link(auth.user_id, &region, &business_id)
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        region = %region,
        business_id = %business_id,
        "Tecopos business linked and credential stored"
    );

    Ok(Json(SaveTokenResponse {
        region,
        business_name,
        has_token: true,
    }))
}

// ─── Supplier Identity Linking ───────────────────────────────

#[derive(Deserialize)]
pub struct LinkSupplierRequest {
    supplier_name: String,
}

#[derive(Serialize)]
pub struct LinkedSupplier {
    pub id: String,
    pub name: String,
}

#[derive(Serialize)]
pub struct LinkSupplierResponse {
    pub ok: bool,
    pub linked_supplier: LinkedSupplier,
}

/// Resolve and store the caller's supplier identity within the linked
/// business.
async fn link_supplier(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<LinkSupplierRequest>,
) -> Result<Json<LinkSupplierResponse>> {
    let user = current_user(&state, &auth).await?;

    // Order check comes before credential lookup and any remote call.
    let (region, business_id) = user.tecopos_link().ok_or(AppError::LinkingOrder)?;

    let credential = state
        .db
        .find_credential(user.id, region)
        .await?
        .ok_or_else(|| AppError::MissingCredential(region.to_string()))?;

    let token = state.secrets.decrypt(&credential.access_token_enc)?;

    let suppliers = state
        .tecopos
        .search_suppliers(region, business_id, &token, req.supplier_name.trim())
        .await?;

    let supplier = resolve_unique(&req.supplier_name, &suppliers, SUPPLIER_NAME_ALIASES)
        .map_err(|candidates| AppError::AmbiguousOrNotFound {
            entity: "supplier",
            candidates,
        })?;

    let supplier_id = string_field(supplier, SUPPLIER_ID_ALIASES).ok_or_else(|| {
        AppError::MalformedRemoteResponse("supplier record has no usable id field".to_string())
    })?;
    let supplier_name = string_field(supplier, SUPPLIER_NAME_ALIASES)
        .unwrap_or_else(|| req.supplier_name.trim().to_string());

    state
        .db
        .set_supplier_link(user.id, &supplier_id, &supplier_name)
        .await?;

    tracing::info!(
        user_id = user.id,
        supplier_id = %supplier_id,
        "Tecopos supplier identity linked"
    );

    Ok(Json(LinkSupplierResponse {
        ok: true,
        linked_supplier: LinkedSupplier {
            id: supplier_id,
            name: supplier_name,
        },
    }))
}
