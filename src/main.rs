// SPDX-License-Identifier: MIT

//! Supplier Portal API Server
//!
//! Backend for suppliers that link their account to a Tecopos business and
//! pull per-period sales reports filtered to their own products.

use std::sync::Arc;
use supplier_portal::{
    config::Config,
    db::Database,
    services::{SecretCodec, TecoposClient},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Supplier Portal API");

    // Connect to Postgres and apply migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    // Token codec; generates an ephemeral key when none is configured
    let secrets =
        SecretCodec::new(config.tokens_secret_key.as_deref()).expect("Failed to build token codec");

    // Tecopos client with the region table from config
    let tecopos =
        TecoposClient::new(config.tecopos_bases.clone()).expect("Failed to build Tecopos client");
    tracing::info!("Tecopos client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        secrets,
        tecopos,
    });

    // Build router
    let app = supplier_portal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("supplier_portal=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
