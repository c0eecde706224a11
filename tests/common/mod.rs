// SPDX-License-Identifier: MIT

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;
use supplier_portal::config::Config;
use supplier_portal::db::Database;
use supplier_portal::routes::create_router;
use supplier_portal::services::{SecretCodec, TecoposClient};
use supplier_portal::AppState;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

/// Skip test with message if no test database is available.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: TEST_DATABASE_URL not set");
            return;
        }
    };
}

/// Codec with a fixed key so ciphertexts are decryptable across instances.
#[allow(dead_code)]
pub fn fixed_codec() -> SecretCodec {
    SecretCodec::new(Some(&BASE64.encode([7u8; 32]))).expect("Failed to build codec")
}

/// Connect to the test database and apply migrations.
#[allow(dead_code)]
pub async fn test_db() -> Database {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL not set");
    let db = Database::connect(&url)
        .await
        .expect("Failed to connect to test database");
    db.migrate().await.expect("Failed to run migrations");
    db
}

/// Create a test app with a lazy (unconnected) database handle.
/// Suitable for paths that never reach the database.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = Database::connect_lazy(&config.database_url).expect("Failed to build lazy pool");
    create_test_app_with_db(db)
}

/// Create a test app around an existing database handle, for router tests
/// that need real rows behind the handlers.
#[allow(dead_code)]
pub fn create_test_app_with_db(db: Database) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();

    let secrets = fixed_codec();
    let tecopos =
        TecoposClient::new(config.tecopos_bases.clone()).expect("Failed to build Tecopos client");

    let state = Arc::new(AppState {
        config,
        db,
        secrets,
        tecopos,
    });

    (create_router(state.clone()), state)
}
