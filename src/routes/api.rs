// SPDX-License-Identifier: MIT

//! Account routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::user::UserResponse;
use crate::models::User;
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use std::sync::Arc;

/// Routes requiring authentication; the middleware is applied in
/// routes/mod.rs.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_me))
}

/// Load the authenticated user's row, or fail if the account vanished.
pub(crate) async fn current_user(state: &AppState, auth: &AuthUser) -> Result<User> {
    state
        .db
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))
}

/// Get current user profile, including Tecopos linkage fields.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = current_user(&state, &user).await?;
    Ok(Json(profile.into()))
}
