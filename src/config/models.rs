use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::constants::{display, network, time};

/// The main configuration structure for momo-dash
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct DashboardConfig {
    /// Transaction API connection settings
    #[serde(default)]
    #[validate]
    pub api: ApiConfig,

    /// Periodic refresh settings
    #[serde(default)]
    #[validate]
    pub refresh: RefreshConfig,

    /// Table and chart presentation settings
    #[serde(default)]
    #[validate]
    pub display: DisplayConfig,
}

/// Connection settings for the transaction API
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to
    #[serde(default = "default_base_url")]
    #[validate(url)]
    pub base_url: String,

    /// HTTP request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub timeout_secs: u64,

    /// Optional `limit` query parameter sent with every listing request
    #[serde(default)]
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            limit: None,
        }
    }
}

/// Periodic refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshConfig {
    /// Whether the live dashboard refreshes on a timer (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds between transaction listing refreshes (default: 60)
    #[serde(default = "default_transactions_interval")]
    #[validate(range(min = 1))]
    pub transactions_interval_secs: u64,

    /// Seconds between summary refreshes (default: 300)
    #[serde(default = "default_summary_interval")]
    #[validate(range(min = 1))]
    pub summary_interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            transactions_interval_secs: default_transactions_interval(),
            summary_interval_secs: default_summary_interval(),
        }
    }
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DisplayConfig {
    /// Rows per table page (default: 10)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 500))]
    pub page_size: usize,

    /// Characters of the note column shown before truncation (default: 50)
    #[serde(default = "default_note_max_len")]
    #[validate(range(min = 1, max = 1000))]
    pub note_max_len: usize,

    /// ISO 4217 code shown in front of amounts (default: "RWF")
    #[serde(default = "default_currency_code")]
    #[validate(custom = "validate_currency_code")]
    pub currency_code: String,

    /// Length of the default trailing date window in days (default: 30)
    #[serde(default = "default_window_days")]
    #[validate(range(min = 1, max = 3660))]
    pub default_window_days: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            note_max_len: default_note_max_len(),
            currency_code: default_currency_code(),
            default_window_days: default_window_days(),
        }
    }
}

fn default_base_url() -> String {
    network::DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    network::HTTP_REQUEST_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

fn default_transactions_interval() -> u64 {
    time::DEFAULT_TRANSACTIONS_REFRESH_SECS
}

fn default_summary_interval() -> u64 {
    time::DEFAULT_SUMMARY_REFRESH_SECS
}

fn default_page_size() -> usize {
    display::DEFAULT_PAGE_SIZE
}

fn default_note_max_len() -> usize {
    display::DEFAULT_NOTE_MAX_LEN
}

fn default_currency_code() -> String {
    display::DEFAULT_CURRENCY_CODE.to_string()
}

fn default_window_days() -> u32 {
    time::DEFAULT_WINDOW_DAYS
}

fn validate_currency_code(code: &str) -> Result<(), ValidationError> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new(
            "currency_code must be three uppercase letters",
        ))
    }
}
