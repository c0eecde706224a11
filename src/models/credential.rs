// SPDX-License-Identifier: MIT

//! Encrypted Tecopos credential, one row per (user, region).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Stored Tecopos bearer token for a user and region.
///
/// Token material is ciphertext only; plaintext never reaches the database.
/// `refresh_token_enc` and `expires_at` are reserved for future token
/// refresh and are not consulted by any workflow today.
#[derive(Debug, Clone, FromRow)]
pub struct TecoposCredential {
    pub id: i64,
    pub user_id: i64,
    pub region: String,
    pub access_token_enc: String,
    pub refresh_token_enc: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}