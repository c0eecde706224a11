// SPDX-License-Identifier: MIT

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unsupported region: {0}")]
    InvalidRegion(String),

    #[error("Tecopos rejected the supplied access token: {0}")]
    InvalidCredential(String),

    /// Name resolution matched zero or more than one candidate with no
    /// single-result fallback. Carries the available names so the caller
    /// can correct their input.
    #[error("Could not resolve {entity} by name; available: {candidates:?}")]
    AmbiguousOrNotFound {
        entity: &'static str,
        candidates: Vec<String>,
    },

    #[error("Tecopos response is missing expected fields: {0}")]
    MalformedRemoteResponse(String),

    #[error("Link a Tecopos business before linking a supplier identity")]
    LinkingOrder,

    #[error("No stored Tecopos credential for region {0}; save a token first")]
    MissingCredential(String),

    #[error("Account is not linked to a Tecopos business")]
    NotLinked,

    #[error("Stored credential could not be decrypted; save the token again")]
    Decryption,

    #[error("Tecopos {operation} failed for region {region}: {detail}")]
    RemoteService {
        region: String,
        operation: &'static str,
        detail: String,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::InvalidRegion(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_region",
                Some(self.to_string()),
            ),
            AppError::InvalidCredential(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_credential",
                Some(self.to_string()),
            ),
            AppError::AmbiguousOrNotFound { .. } => (
                StatusCode::NOT_FOUND,
                "ambiguous_or_not_found",
                Some(self.to_string()),
            ),
            AppError::LinkingOrder => (
                StatusCode::BAD_REQUEST,
                "linking_order",
                Some(self.to_string()),
            ),
            AppError::MissingCredential(_) => (
                StatusCode::NOT_FOUND,
                "missing_credential",
                Some(self.to_string()),
            ),
            AppError::NotLinked => {
                (StatusCode::BAD_REQUEST, "not_linked", Some(self.to_string()))
            }
            AppError::Decryption => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "decryption_failed",
                Some(self.to_string()),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            // The remote platform, not the caller, is at fault for these two.
            AppError::RemoteService { .. } => {
                tracing::error!(error = %self, "Tecopos call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "remote_service_error",
                    Some(self.to_string()),
                )
            }
            AppError::MalformedRemoteResponse(msg) => {
                tracing::error!(error = %msg, "Malformed Tecopos response");
                (
                    StatusCode::BAD_GATEWAY,
                    "malformed_remote_response",
                    Some(msg.clone()),
                )
            }
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        // Unique-constraint violations surface as retryable conflicts
        // (duplicate email, raced credential upsert).
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.code().as_deref() == Some("23505") {
                return AppError::Conflict(db_err.message().to_string());
            }
        }
        AppError::Database(err.to_string())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
