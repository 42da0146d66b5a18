//! Application-wide constants
//!
//! This module contains the magic numbers and default values used throughout
//! the dashboard, making them easy to find and modify.

/// Display-related constants
pub mod display {
    /// Number of transactions shown per table page
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Maximum characters of a transaction note shown in the table
    pub const DEFAULT_NOTE_MAX_LEN: usize = 50;

    /// Marker appended to truncated text
    pub const ELLIPSIS: &str = "...";

    /// Placeholder for missing values
    pub const NOT_AVAILABLE: &str = "N/A";

    /// Currency code rendered in front of amounts
    pub const DEFAULT_CURRENCY_CODE: &str = "RWF";

    /// Message shown when the current page has no rows
    pub const EMPTY_TABLE_MESSAGE: &str = "No transactions found matching your criteria";

    /// Width in characters of the longest bar in a console chart
    pub const CHART_BAR_WIDTH: usize = 40;
}

/// Time-related constants
pub mod time {
    /// Length of the default trailing date window (in days)
    pub const DEFAULT_WINDOW_DAYS: u32 = 30;

    /// Default transaction listing refresh interval (in seconds)
    pub const DEFAULT_TRANSACTIONS_REFRESH_SECS: u64 = 60;

    /// Default summary refresh interval (in seconds)
    pub const DEFAULT_SUMMARY_REFRESH_SECS: u64 = 300;
}

/// Network-related constants
pub mod network {
    /// Default HTTP request timeout (in seconds)
    pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Default API base URL
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

    /// Environment variable overriding the configured API base URL
    pub const API_URL_ENV_VAR: &str = "MOMO_DASH_API_URL";

    /// Listing endpoint path
    pub const TRANSACTIONS_PATH: &str = "/api/transactions";

    /// Summary endpoint path
    pub const SUMMARY_PATH: &str = "/api/summary";

    /// Legacy free-text search endpoint path
    pub const SEARCH_PATH: &str = "/api/search";
}
