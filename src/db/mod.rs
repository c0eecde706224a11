// SPDX-License-Identifier: MIT

//! Postgres persistence layer with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and Tecopos linkage fields)
//! - Credentials (encrypted Tecopos tokens, unique per user and region)
//! - Sales snapshots, conciliations and inventory snapshots

use crate::error::AppError;
use crate::models::{Conciliation, InventorySnapshot, Sale, TecoposCredential, User};
use chrono::NaiveDate;
use sqlx::postgres::{PgPool, PgPoolOptions};

const MAX_CONNECTIONS: u32 = 5;

/// Database handle shared across requests.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to Postgres and verify the connection.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Postgres: {}", e)))?;

        tracing::info!("Connected to Postgres");

        Ok(Self { pool })
    }

    /// Create a handle without establishing a connection. Used by tests
    /// that only exercise paths which never reach the database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy(database_url)
            .map_err(|e| AppError::Database(format!("Invalid database URL: {}", e)))?;

        Ok(Self { pool })
    }

    /// Run embedded migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {}", e)))
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_user_by_id(&self, user_id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Persist the resolved business linkage. Supplier fields are left
    /// untouched so a token can be re-saved without forcing the supplier
    /// identity to be linked again.
    pub async fn set_business_link(
        &self,
        user_id: i64,
        region: &str,
        business_id: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET tecopos_region = $2, tecopos_business_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(region)
        .bind(business_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Persist the resolved supplier identity.
    pub async fn set_supplier_link(
        &self,
        user_id: i64,
        supplier_id: &str,
        supplier_name: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET tecopos_supplier_id = $2, tecopos_supplier_name = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(supplier_id)
        .bind(supplier_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Insert or update the credential for (user, region). The unique
    /// constraint on the pair keeps concurrent saves down to one row;
    /// `updated_at` advances on every save.
    pub async fn upsert_credential(
        &self,
        user_id: i64,
        region: &str,
        access_token_enc: &str,
    ) -> Result<TecoposCredential, AppError> {
        let credential = sqlx::query_as::<_, TecoposCredential>(
            r#"
            INSERT INTO tecopos_credentials (user_id, region, access_token_enc)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, region) DO UPDATE SET
                access_token_enc = EXCLUDED.access_token_enc,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(region)
        .bind(access_token_enc)
        .fetch_one(&self.pool)
        .await?;

        Ok(credential)
    }

    pub async fn find_credential(
        &self,
        user_id: i64,
        region: &str,
    ) -> Result<Option<TecoposCredential>, AppError> {
        let credential = sqlx::query_as::<_, TecoposCredential>(
            "SELECT * FROM tecopos_credentials WHERE user_id = $1 AND region = $2",
        )
        .bind(user_id)
        .bind(region)
        .fetch_optional(&self.pool)
        .await?;

        Ok(credential)
    }

    // ─── Sales Operations ────────────────────────────────────────

    pub async fn insert_sale(
        &self,
        user_id: i64,
        date_from: NaiveDate,
        date_to: NaiveDate,
        data: &serde_json::Value,
        total_amount: f64,
        total_quantity: f64,
    ) -> Result<Sale, AppError> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (user_id, date_from, date_to, data, total_amount, total_quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(date_from)
        .bind(date_to)
        .bind(data)
        .bind(total_amount)
        .bind(total_quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(sale)
    }

    pub async fn find_sale(&self, user_id: i64, sale_id: i64) -> Result<Option<Sale>, AppError> {
        let sale =
            sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1 AND user_id = $2")
                .bind(sale_id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(sale)
    }

    // ─── Conciliation Operations ─────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_conciliation(
        &self,
        user_id: i64,
        range_label: &str,
        orders: i32,
        sales_qty: f64,
        revenue: f64,
        discounts: f64,
        total: f64,
    ) -> Result<Conciliation, AppError> {
        let conciliation = sqlx::query_as::<_, Conciliation>(
            r#"
            INSERT INTO conciliations
                (user_id, range_label, orders, sales_qty, revenue, discounts, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(range_label)
        .bind(orders)
        .bind(sales_qty)
        .bind(revenue)
        .bind(discounts)
        .bind(total)
        .fetch_one(&self.pool)
        .await?;

        Ok(conciliation)
    }

    pub async fn list_conciliations(&self, user_id: i64) -> Result<Vec<Conciliation>, AppError> {
        let conciliations = sqlx::query_as::<_, Conciliation>(
            "SELECT * FROM conciliations WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(conciliations)
    }

    // ─── Inventory Operations ────────────────────────────────────

    /// Append one snapshot row per product, all within a transaction so a
    /// partial report never leaves a half-written snapshot.
    pub async fn insert_inventory_snapshots(
        &self,
        user_id: i64,
        items: &[(String, String, f64)],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for (product_id, name, total_quantity) in items {
            sqlx::query(
                r#"
                INSERT INTO inventory_snapshots (user_id, product_id, name, total_quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(user_id)
            .bind(product_id)
            .bind(name)
            .bind(total_quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Latest snapshot per product for one user.
    pub async fn latest_inventory(&self, user_id: i64) -> Result<Vec<InventorySnapshot>, AppError> {
        let snapshots = sqlx::query_as::<_, InventorySnapshot>(
            r#"
            SELECT DISTINCT ON (product_id) *
            FROM inventory_snapshots
            WHERE user_id = $1
            ORDER BY product_id, created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }
}
