//! Display formatting for raw transaction fields
//!
//! Every function here is total: malformed or missing input renders as a
//! placeholder instead of failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::display::{DEFAULT_CURRENCY_CODE, ELLIPSIS, NOT_AVAILABLE};
use crate::models::TransactionType;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

fn parse_loose_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|datetime| datetime.date())
}

/// Formats a raw date as `Mon D, YYYY` (e.g. `Jan 5, 2024`)
pub fn format_date(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(parse_loose_date)
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats an amount in the default currency with no fractional digits
pub fn format_currency(amount: Option<Decimal>) -> String {
    format_currency_in(DEFAULT_CURRENCY_CODE, amount)
}

/// Formats an amount in whole units, grouped by thousands, prefixed by `code`
pub fn format_currency_in(code: &str, amount: Option<Decimal>) -> String {
    let Some(amount) = amount else {
        return NOT_AVAILABLE.to_string();
    };

    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    format!("{code} {sign}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Maps a type code to its label; unknown codes pass through unchanged
pub fn format_type(code: &str) -> String {
    TransactionType::from(code)
        .label()
        .map(str::to_string)
        .unwrap_or_else(|| code.to_string())
}

/// Shortens `text` to `max_len` characters followed by an ellipsis
pub fn truncate(text: Option<&str>, max_len: usize) -> String {
    let Some(text) = text else {
        return String::new();
    };

    if text.chars().count() <= max_len {
        return text.to_string();
    }

    let mut short: String = text.chars().take(max_len).collect();
    short.push_str(ELLIPSIS);
    short
}
