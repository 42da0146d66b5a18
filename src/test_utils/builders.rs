//! Test data builders for creating common test objects

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{MonthlyTotal, SummaryData, Transaction, TransactionType, TypeTotal};
use crate::query::FilterState;

/// Builder for creating test transactions
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    id: Option<String>,
    kind: TransactionType,
    amount: Option<Decimal>,
    counterparty: Option<String>,
    date: Option<String>,
    note: Option<String>,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionBuilder {
    /// Create a new TransactionBuilder with default test values
    pub fn new() -> Self {
        Self {
            id: Some("tx-1".to_string()),
            kind: TransactionType::Incoming,
            amount: Some(Decimal::new(1000, 0)),
            counterparty: None,
            date: Some("2024-01-15 09:30:00".to_string()),
            note: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.kind = kind;
        self
    }

    /// Set a whole-unit amount
    pub fn with_amount(mut self, amount: i64) -> Self {
        self.amount = Some(Decimal::from(amount));
        self
    }

    pub fn with_decimal_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn without_amount(mut self) -> Self {
        self.amount = None;
        self
    }

    pub fn with_counterparty(mut self, party: &str) -> Self {
        self.counterparty = Some(party.to_string());
        self
    }

    pub fn with_date(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn without_date(mut self) -> Self {
        self.date = None;
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Build the Transaction
    pub fn build(self) -> Transaction {
        Transaction {
            id: self.id,
            kind: self.kind,
            amount: self.amount,
            counterparty: self.counterparty,
            date: self.date,
            note: self.note,
        }
    }

    /// `count` incoming transactions with ids `{prefix}-0`.. and rising amounts
    pub fn batch(prefix: &str, count: usize) -> Vec<Transaction> {
        (0..count)
            .map(|i| {
                Self::new()
                    .with_id(&format!("{prefix}-{i}"))
                    .with_amount(100 * (i as i64 + 1))
                    .build()
            })
            .collect()
    }
}

/// Builder for creating test filter sets
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    filters: FilterState,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, kind: TransactionType) -> Self {
        self.filters.kind = Some(kind);
        self
    }

    /// Set the date range; panics on a malformed `YYYY-MM-DD` literal
    pub fn with_dates(mut self, start: &str, end: &str) -> Self {
        self.filters.start_date = Some(parse_day(start));
        self.filters.end_date = Some(parse_day(end));
        self
    }

    pub fn with_start_date(mut self, start: &str) -> Self {
        self.filters.start_date = Some(parse_day(start));
        self
    }

    pub fn with_end_date(mut self, end: &str) -> Self {
        self.filters.end_date = Some(parse_day(end));
        self
    }

    pub fn with_min_amount(mut self, min: i64) -> Self {
        self.filters.min_amount = Some(Decimal::from(min));
        self
    }

    pub fn with_max_amount(mut self, max: i64) -> Self {
        self.filters.max_amount = Some(Decimal::from(max));
        self
    }

    pub fn build(self) -> FilterState {
        self.filters
    }
}

fn parse_day(value: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => date,
        Err(e) => panic!("bad test date {value:?}: {e}"),
    }
}

/// Builder for creating test summaries
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    summary: SummaryData,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, code: &str, total: f64) -> Self {
        self.summary.by_type.push(TypeTotal {
            kind: TransactionType::from(code),
            total: Some(total),
        });
        self
    }

    pub fn with_month(mut self, month: &str, total: f64) -> Self {
        self.summary.monthly.push(MonthlyTotal {
            month: month.to_string(),
            total: Some(total),
            count: None,
        });
        self
    }

    pub fn build(self) -> SummaryData {
        self.summary
    }
}
