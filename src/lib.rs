//! momo-dash: client-side pipeline for a mobile-money transaction dashboard.
//!
//! Filters become listing queries, fetched records become a paginated table
//! and aggregate totals become chart datasets.

pub mod charts;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;
pub mod pagination;
pub mod query;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

pub use error::DashboardError;
