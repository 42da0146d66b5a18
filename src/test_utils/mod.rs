//! Test utilities for the momo-dash codebase
//!
//! Builders for transactions, filters and summaries, plus scripted mocks
//! for the data source and both render collaborators.

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
