use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use super::models::{ApiEnvelope, SearchPayload};
use super::TransactionSource;
use crate::config::models::ApiConfig;
use crate::constants::network::{SEARCH_PATH, SUMMARY_PATH, TRANSACTIONS_PATH};
use crate::models::{SummaryData, Transaction};
use crate::query::{build_query, FilterState};

/// Errors that can occur when fetching dashboard data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error with status code: {0}")]
    Status(u16),

    #[error("API error: {0}")]
    Api(String),

    #[error("JSON parsing error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Message shown next to the view region that failed to load
    pub fn user_message(&self, what: &str) -> String {
        format!("Failed to load {what}. Please try again. ({self})")
    }
}

/// HTTP client for the transaction listing, summary and search endpoints
pub struct DataClient {
    client: Client,
    base_url: String,
    limit: Option<u32>,
}

impl DataClient {
    /// Creates a client for the API described by `config`
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("momo-dash/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            limit: config.limit,
        })
    }

    /// Creates a client with default settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
        let raw = format!("{}{}", self.base_url, path);
        let url = if params.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, params)
        };
        url.map_err(|e| FetchError::Network(format!("Invalid URL '{raw}': {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("Fetching data from: {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn listing_params(&self, filters: &FilterState) -> Vec<(&'static str, String)> {
        let mut params = build_query(filters);
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }

    async fn try_fetch_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, FetchError> {
        let url = self.endpoint(TRANSACTIONS_PATH, &self.listing_params(filters))?;
        let envelope: ApiEnvelope<Vec<Transaction>> = self.get_json(url).await?;
        envelope.into_data()
    }

    async fn try_fetch_summary(&self) -> Result<SummaryData, FetchError> {
        let url = self.endpoint(SUMMARY_PATH, &[])?;
        let envelope: ApiEnvelope<SummaryData> = self.get_json(url).await?;
        envelope.into_data()
    }

    async fn try_search(&self, query: &str) -> Result<Vec<Transaction>, FetchError> {
        let url = self.endpoint(SEARCH_PATH, &[("query", query.to_string())])?;
        let payload: SearchPayload = self.get_json(url).await?;
        payload.into_transactions()
    }
}

fn log_failure<T>(what: &str, result: Result<T, FetchError>) -> Result<T, FetchError> {
    if let Err(e) = &result {
        error!("Error fetching {}: {}", what, e);
    }
    result
}

#[async_trait]
impl TransactionSource for DataClient {
    async fn fetch_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, FetchError> {
        let result = self.try_fetch_transactions(filters).await;
        if let Ok(transactions) = &result {
            debug!("Fetched {} transactions", transactions.len());
        }
        log_failure("transactions", result)
    }

    async fn fetch_summary(&self) -> Result<SummaryData, FetchError> {
        log_failure("summary data", self.try_fetch_summary().await)
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>, FetchError> {
        log_failure("search results", self.try_search(query).await)
    }

    fn name(&self) -> &str {
        &self.base_url
    }
}
