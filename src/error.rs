use thiserror::Error;

use crate::client::FetchError;
use crate::query::ValidationError;
use crate::view::CommandError;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid filters: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Command(#[from] CommandError),

    /// Listing failure as shown to the user
    #[error("{0}")]
    Listing(String),

    #[error("Dashboard event loop is no longer running")]
    Closed,
}
