// SPDX-License-Identifier: MIT

//! User model for storage and API.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A registered supplier account.
///
/// The `tecopos_*` columns hold the linkage to the remote platform and stay
/// `NULL` until the account is linked. Supplier identity is only ever set
/// after region and business (linking order invariant).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub tecopos_region: Option<String>,
    pub tecopos_business_id: Option<String>,
    pub tecopos_supplier_id: Option<String>,
    pub tecopos_supplier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Region and business id, if the account has completed business
    /// linking. Workflows that require linkage check this before doing any
    /// remote or credential work.
    pub fn tecopos_link(&self) -> Option<(&str, &str)> {
        match (
            self.tecopos_region.as_deref(),
            self.tecopos_business_id.as_deref(),
        ) {
            (Some(region), Some(business_id)) => Some((region, business_id)),
            _ => None,
        }
    }
}

/// User summary returned by the API. Never includes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub tecopos_region: Option<String>,
    pub tecopos_business_id: Option<String>,
    pub tecopos_supplier_id: Option<String>,
    pub tecopos_supplier_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            tecopos_region: user.tecopos_region,
            tecopos_business_id: user.tecopos_business_id,
            tecopos_supplier_id: user.tecopos_supplier_id,
            tecopos_supplier_name: user.tecopos_supplier_name,
            created_at: user.created_at,
        }
    }
}
