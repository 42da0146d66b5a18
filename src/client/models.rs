use serde::Deserialize;

use super::fetcher::FetchError;
use crate::models::Transaction;

/// Standard `{success, data, error}` wrapper used by the dashboard API
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, turning a failure flag into `FetchError::Api`
    pub fn into_data(self) -> Result<T, FetchError> {
        if !self.success {
            let reason = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(FetchError::Api(reason));
        }

        self.data
            .ok_or_else(|| FetchError::Decode("response envelope has no data".to_string()))
    }
}

/// Search results come either bare or wrapped, depending on the server version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Bare(Vec<Transaction>),
    Wrapped(ApiEnvelope<Vec<Transaction>>),
}

impl SearchPayload {
    pub fn into_transactions(self) -> Result<Vec<Transaction>, FetchError> {
        match self {
            SearchPayload::Bare(transactions) => Ok(transactions),
            SearchPayload::Wrapped(envelope) => envelope.into_data(),
        }
    }
}
