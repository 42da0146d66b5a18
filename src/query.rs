//! Filter state and its mapping to listing query parameters

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::TransactionType;

/// Errors raised when a filter contradicts itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },

    #[error("Minimum amount {min} is greater than maximum amount {max}")]
    MinAboveMax { min: Decimal, max: Decimal },
}

/// User-chosen filters for the transaction listing.
///
/// `None` means the field is empty and is left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub kind: Option<TransactionType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
}

impl FilterState {
    /// Trailing window of `days` days ending at `today`, all other fields empty
    pub fn default_window(today: NaiveDate, days: u32) -> Self {
        Self {
            start_date: Some(today - Duration::days(i64::from(days))),
            end_date: Some(today),
            ..Self::default()
        }
    }

    /// Checks that the filter ranges are not inverted
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::StartAfterEnd { start, end });
            }
        }

        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(ValidationError::MinAboveMax { min, max });
            }
        }

        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Builds the listing query for `filters`.
///
/// Only non-empty fields are emitted, always in the order
/// `type, start_date, end_date, min_amount, max_amount`.
pub fn build_query(filters: &FilterState) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(5);

    if let Some(kind) = filters.kind.as_ref().filter(|k| !k.code().is_empty()) {
        params.push(("type", kind.code().to_string()));
    }
    if let Some(start) = filters.start_date {
        params.push(("start_date", start.format("%Y-%m-%d").to_string()));
    }
    if let Some(end) = filters.end_date {
        params.push(("end_date", end.format("%Y-%m-%d").to_string()));
    }
    if let Some(min) = filters.min_amount {
        params.push(("min_amount", min.normalize().to_string()));
    }
    if let Some(max) = filters.max_amount {
        params.push(("max_amount", max.normalize().to_string()));
    }

    params
}
