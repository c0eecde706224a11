// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup and cached in memory; nothing in the
//! request path touches the environment.

use std::collections::HashMap;
use std::env;

/// Supported Tecopos regions and their default base URLs. A region selects
/// which deployment of the remote platform the account lives on.
pub const DEFAULT_REGION_BASES: [(&str, &str); 4] = [
    ("api", "https://api.tecopos.com"),
    ("api2", "https://api2.tecopos.com"),
    ("api3", "https://api3.tecopos.com"),
    ("api4", "https://api4.tecopos.com"),
];

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Postgres connection string
    pub database_url: String,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Base64 key for encrypting stored Tecopos tokens. When absent a
    /// process-local key is generated at startup; previously stored
    /// credentials become undecryptable after a restart in that mode.
    pub tokens_secret_key: Option<String>,
    /// Tecopos base URL per region (defaults plus `TECOPOS_BASE_<region>`
    /// overrides), resolved once here so the client never reads env vars.
    pub tecopos_bases: HashMap<String, String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            tokens_secret_key: env::var("TOKENS_SECRET_KEY")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            tecopos_bases: region_bases_from_env(),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "postgres://localhost/supplier_portal_test".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            tokens_secret_key: None,
            tecopos_bases: DEFAULT_REGION_BASES
                .iter()
                .map(|(region, base)| (region.to_string(), base.to_string()))
                .collect(),
        }
    }
}

/// Build the region -> base URL table, applying `TECOPOS_BASE_<region>`
/// overrides on top of the built-in defaults.
fn region_bases_from_env() -> HashMap<String, String> {
    DEFAULT_REGION_BASES
        .iter()
        .map(|(region, default_base)| {
            let base = env::var(format!("TECOPOS_BASE_{}", region))
                .unwrap_or_else(|_| default_base.to_string());
            (region.to_string(), base)
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
