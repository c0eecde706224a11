// SPDX-License-Identifier: MIT

//! Tecopos API client.
//!
//! Stateless wrapper over the remote commerce platform: every call takes the
//! region, bearer token and (where business-scoped) business id explicitly —
//! nothing is cached here. Failures surface as `AppError::RemoteService`
//! with the region and operation attached; no retries are attempted.

use crate::error::AppError;
use chrono::NaiveDate;
use reqwest::header;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Supported Tecopos regions, exposed via GET /regions.
pub const REGIONS: [&str; 4] = ["api", "api2", "api3", "api4"];

/// Business-scoped calls carry the business id in this header.
const BUSINESS_ID_HEADER: &str = "x-app-businessid";

/// Fixed per-call timeout; a timeout is reported like any other remote
/// failure.
const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

pub fn is_supported_region(region: &str) -> bool {
    REGIONS.contains(&region)
}

/// Tecopos REST client.
#[derive(Clone)]
pub struct TecoposClient {
    http: reqwest::Client,
    /// Region -> base URL, resolved from config at startup.
    bases: HashMap<String, String>,
}

impl TecoposClient {
    /// Create a client with the region table from config.
    pub fn new(bases: HashMap<String, String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REMOTE_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self { http, bases })
    }

    fn base_url(&self, region: &str) -> Result<&str, AppError> {
        self.bases
            .get(region)
            .map(|base| base.trim_end_matches('/'))
            .ok_or_else(|| AppError::InvalidRegion(region.to_string()))
    }

    /// List the businesses the token grants access to. A rejected or
    /// expired token makes this call fail; that failure is the only
    /// validation a submitted token gets.
    pub async fn list_businesses(&self, region: &str, token: &str) -> Result<Vec<Value>, AppError> {
        const OPERATION: &str = "list-businesses";

        let url = format!("{}/api/v1/administration/my-business", self.base_url(region)?);

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| remote_error(region, OPERATION, e.to_string()))?;

        Self::json_records(response, region, OPERATION).await
    }

    /// Search suppliers by name within one business.
    pub async fn search_suppliers(
        &self,
        region: &str,
        business_id: &str,
        token: &str,
        name_query: &str,
    ) -> Result<Vec<Value>, AppError> {
        const OPERATION: &str = "search-suppliers";

        let url = format!("{}/api/v1/administration/provider", self.base_url(region)?);

        let response = self
            .http
            .get(&url)
            .header(header::AUTHORIZATION, token)
            .header(BUSINESS_ID_HEADER, business_id)
            .query(&[("page", "1"), ("name", name_query)])
            .send()
            .await
            .map_err(|e| remote_error(region, OPERATION, e.to_string()))?;

        Self::json_records(response, region, OPERATION).await
    }

    /// Fetch the sold-products report for a calendar date range. The remote
    /// service defines the report granularity (per product, aggregated over
    /// the range).
    pub async fn selled_products(
        &self,
        region: &str,
        business_id: &str,
        token: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<Value>, AppError> {
        const OPERATION: &str = "selled-products";

        let url = format!("{}/api/v1/report/selled-products", self.base_url(region)?);

        let body = serde_json::json!({
            "dateFrom": date_from.format("%Y-%m-%d").to_string(),
            "dateTo": date_to.format("%Y-%m-%d").to_string(),
        });

        let response = self
            .http
            .post(&url)
            .header(header::AUTHORIZATION, token)
            .header(BUSINESS_ID_HEADER, business_id)
            .json(&body)
            .send()
            .await
            .map_err(|e| remote_error(region, OPERATION, e.to_string()))?;

        Self::json_records(response, region, OPERATION).await
    }

    /// Check the response status and parse the body into a list of records.
    async fn json_records(
        response: reqwest::Response,
        region: &str,
        operation: &'static str,
    ) -> Result<Vec<Value>, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(remote_error(
                region,
                operation,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| remote_error(region, operation, format!("JSON parse error: {}", e)))?;

        Ok(flatten_records(value))
    }
}

/// Normalize a schema-flexible payload into a list of records: arrays pass
/// through, known wrapper keys are unwrapped, a bare object becomes a
/// one-element list.
pub fn flatten_records(value: Value) -> Vec<Value> {
    const WRAPPER_KEYS: [&str; 4] = ["items", "data", "products", "result"];

    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        Value::Object(ref map) => {
            for key in WRAPPER_KEYS {
                if let Some(Value::Array(items)) = map.get(key) {
                    return items.clone();
                }
            }
            vec![value]
        }
        other => vec![other],
    }
}

fn remote_error(region: &str, operation: &'static str, detail: String) -> AppError {
    AppError::RemoteService {
        region: region.to_string(),
        operation,
        detail,
    }
}
