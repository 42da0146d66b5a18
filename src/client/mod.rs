pub mod fetcher;
pub mod models;
#[cfg(test)]
mod tests;

pub use fetcher::{DataClient, FetchError};

use async_trait::async_trait;

use crate::models::{SummaryData, Transaction};
use crate::query::FilterState;

/// Source of dashboard data.
///
/// Implementations report failures as values and log them before returning.
/// They never retry on their own.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch the full listing matching `filters`
    async fn fetch_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, FetchError>;

    /// Fetch the aggregated totals
    async fn fetch_summary(&self) -> Result<SummaryData, FetchError>;

    /// Free-text search over all transactions
    async fn search(&self, query: &str) -> Result<Vec<Transaction>, FetchError>;

    /// Get the name of this source, used in logs
    fn name(&self) -> &str;
}
