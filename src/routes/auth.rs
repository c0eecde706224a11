// SPDX-License-Identifier: MIT

//! Registration and login.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_jwt;
use crate::models::user::UserResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    name: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    password: String,
}

/// Register a new supplier account.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    req.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if state.db.find_user_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let password_hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

    // The unique constraint on email backs up the pre-check under
    // concurrent registrations (From<sqlx::Error> maps it to Conflict).
    let user = state
        .db
        .create_user(&req.email, &req.name, &password_hash)
        .await?;

    tracing::info!(user_id = user.id, "Supplier registered");

    Ok((StatusCode::CREATED, Json(user.into())))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Authenticate a supplier and return a session token.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let invalid = || AppError::BadRequest("Incorrect email or password".to_string());

    let user = state
        .db
        .find_user_by_email(&req.email)
        .await?
        .ok_or_else(invalid)?;

    let verified = bcrypt::verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification failed: {}", e)))?;
    if !verified {
        return Err(invalid());
    }

    let access_token = create_jwt(user.id, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}
