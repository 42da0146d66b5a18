use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction category as reported by the API.
///
/// Codes outside the known set are kept verbatim in `Unknown` so a newer
/// server never breaks decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    Incoming,
    Payment,
    Transfer,
    Deposit,
    Airtime,
    CashPower,
    Withdrawal,
    Bundle,
    Other,
    Unknown(String),
}

impl TransactionType {
    /// Wire code of this type (e.g. "cash_power")
    pub fn code(&self) -> &str {
        match self {
            TransactionType::Incoming => "incoming",
            TransactionType::Payment => "payment",
            TransactionType::Transfer => "transfer",
            TransactionType::Deposit => "deposit",
            TransactionType::Airtime => "airtime",
            TransactionType::CashPower => "cash_power",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Bundle => "bundle",
            TransactionType::Other => "other",
            TransactionType::Unknown(code) => code,
        }
    }

    /// Human readable label, `None` for unknown codes
    pub fn label(&self) -> Option<&'static str> {
        match self {
            TransactionType::Incoming => Some("Incoming"),
            TransactionType::Payment => Some("Payment"),
            TransactionType::Transfer => Some("Transfer"),
            TransactionType::Deposit => Some("Deposit"),
            TransactionType::Airtime => Some("Airtime"),
            TransactionType::CashPower => Some("Cash Power"),
            TransactionType::Withdrawal => Some("Withdrawal"),
            TransactionType::Bundle => Some("Bundle"),
            TransactionType::Other => Some("Other"),
            TransactionType::Unknown(_) => None,
        }
    }
}

impl From<&str> for TransactionType {
    fn from(code: &str) -> Self {
        match code {
            "incoming" => TransactionType::Incoming,
            "payment" => TransactionType::Payment,
            "transfer" => TransactionType::Transfer,
            "deposit" => TransactionType::Deposit,
            "airtime" => TransactionType::Airtime,
            "cash_power" => TransactionType::CashPower,
            "withdrawal" => TransactionType::Withdrawal,
            "bundle" => TransactionType::Bundle,
            "other" => TransactionType::Other,
            unknown => TransactionType::Unknown(unknown.to_string()),
        }
    }
}

impl From<String> for TransactionType {
    fn from(code: String) -> Self {
        TransactionType::from(code.as_str())
    }
}

impl From<TransactionType> for String {
    fn from(kind: TransactionType) -> Self {
        kind.code().to_string()
    }
}

impl FromStr for TransactionType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TransactionType::from(s))
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single transaction record received from the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Option<Decimal>,
    /// Sender or recipient, whichever the record carries
    pub counterparty: Option<String>,
    /// Raw date string as sent by the server
    pub date: Option<String>,
    pub note: Option<String>,
}

impl Transaction {
    /// Case-insensitive match used by the quick search box.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        self.kind.code().to_lowercase().contains(needle)
            || self
                .counterparty
                .as_deref()
                .is_some_and(|party| party.to_lowercase().contains(needle))
            || self
                .amount
                .is_some_and(|amount| amount.normalize().to_string().contains(needle))
    }
}

/// Wire shape of a transaction; accepts the field names used by older servers
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    #[serde(default, alias = "tx_id")]
    id: Option<RecordId>,
    #[serde(default, rename = "type", alias = "transaction_type")]
    kind: Option<String>,
    #[serde(default)]
    amount: Option<Decimal>,
    #[serde(default)]
    counterparty: Option<String>,
    #[serde(default)]
    party: Option<String>,
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    sender: Option<String>,
    #[serde(default, alias = "transaction_date")]
    date: Option<String>,
    #[serde(default, alias = "message_body", alias = "body")]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    Text(String),
    Number(serde_json::Number),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let counterparty = non_empty(record.counterparty)
            .or_else(|| non_empty(record.party))
            .or_else(|| non_empty(record.recipient))
            .or_else(|| non_empty(record.sender));

        Self {
            id: record.id.map(|id| match id {
                RecordId::Text(text) => text,
                RecordId::Number(number) => number.to_string(),
            }),
            kind: record
                .kind
                .map(TransactionType::from)
                .unwrap_or(TransactionType::Other),
            amount: record.amount,
            counterparty,
            date: non_empty(record.date),
            note: record.note,
        }
    }
}

/// Total amount for one transaction type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeTotal {
    #[serde(rename = "type", alias = "transaction_type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub total: Option<f64>,
}

/// Total amount for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Month key in `YYYY-MM` form
    pub month: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// Aggregated totals served by the summary endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default, alias = "byType")]
    pub by_type: Vec<TypeTotal>,
    #[serde(default)]
    pub monthly: Vec<MonthlyTotal>,
}
