// SPDX-License-Identifier: MIT

//! Supplier Portal backend.
//!
//! Suppliers register locally, link their account to a Tecopos business and
//! supplier identity, and pull filtered sales reports from the platform.
//! Tecopos bearer tokens are stored encrypted at rest.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Database;
use services::{SecretCodec, TecoposClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub secrets: SecretCodec,
    pub tecopos: TecoposClient,
}
