//! Dashboard state and its transitions.
//!
//! `DashboardState::handle` is a pure transition: it mutates the owned state
//! and returns the effects (fetches, renders) the runtime has to carry out.
//! Nothing in here touches the network, a clock or a view.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::client::FetchError;
use crate::constants::{display, time};
use crate::models::{SummaryData, Transaction};
use crate::pagination::{PageControl, PageState};
use crate::query::{FilterState, ValidationError};

/// Progress of one fetch purpose (listing or summary)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Loading,
    Loaded,
    Error(String),
}

/// Sequence number of an issued request; only the latest one may land
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic token issuer for a single fetch purpose
#[derive(Debug, Clone, Default)]
struct RequestSequence {
    issued: u64,
    in_flight: Option<RequestToken>,
}

impl RequestSequence {
    fn issue(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.in_flight = Some(token);
        token
    }

    /// Accepts `token` if it is the outstanding latest request
    fn resolve(&mut self, token: RequestToken) -> bool {
        if self.in_flight == Some(token) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

/// Inputs to the dashboard: user actions, timer ticks and fetch completions
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ApplyFilters(FilterState),
    ResetFilters { today: NaiveDate },
    ChangePage(usize),
    NextPage,
    PreviousPage,
    Search(String),
    RefreshTick,
    SummaryTick,
    RequestSummary,
    TransactionsLoaded {
        token: RequestToken,
        result: Result<Vec<Transaction>, FetchError>,
    },
    SummaryLoaded {
        token: RequestToken,
        result: Result<SummaryData, FetchError>,
    },
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchTransactions {
        token: RequestToken,
        filters: FilterState,
    },
    FetchSummary {
        token: RequestToken,
    },
    /// Redraw table rows, the transaction count and the pagination bar
    RenderTable,
    RenderCharts,
    RenderListingError(String),
    RenderSummaryError(String),
    RenderValidation(String),
}

/// Everything the dashboard knows between server responses
#[derive(Debug, Clone)]
pub struct DashboardState {
    filters: FilterState,
    page: PageState,
    window_days: u32,
    dataset: Vec<Transaction>,
    search: String,
    /// Indices into `dataset` that pass the quick search
    visible: Vec<usize>,
    summary: Option<SummaryData>,
    listing: CycleState,
    summary_cycle: CycleState,
    listing_requests: RequestSequence,
    summary_requests: RequestSequence,
    validation: Option<ValidationError>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(display::DEFAULT_PAGE_SIZE, time::DEFAULT_WINDOW_DAYS)
    }
}

impl DashboardState {
    /// Idle state with an empty dataset
    pub fn new(page_size: usize, window_days: u32) -> Self {
        Self {
            filters: FilterState::default(),
            page: PageState::new(page_size),
            window_days,
            dataset: Vec::new(),
            search: String::new(),
            visible: Vec::new(),
            summary: None,
            listing: CycleState::Idle,
            summary_cycle: CycleState::Idle,
            listing_requests: RequestSequence::default(),
            summary_requests: RequestSequence::default(),
            validation: None,
        }
    }

    /// Replaces the dataset directly, as if a fetch had just succeeded
    pub fn with_dataset(mut self, dataset: Vec<Transaction>) -> Self {
        self.replace_dataset(dataset);
        self.page.reset();
        self.listing = CycleState::Loaded;
        self
    }

    /// Replaces the summary directly, as if a fetch had just succeeded
    pub fn with_summary(mut self, summary: SummaryData) -> Self {
        self.summary = Some(summary);
        self.summary_cycle = CycleState::Loaded;
        self
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn current_page(&self) -> usize {
        self.page.current_page()
    }

    pub fn dataset(&self) -> &[Transaction] {
        &self.dataset
    }

    pub fn search_query(&self) -> &str {
        &self.search
    }

    pub fn summary(&self) -> Option<&SummaryData> {
        self.summary.as_ref()
    }

    pub fn listing_state(&self) -> &CycleState {
        &self.listing
    }

    pub fn summary_state(&self) -> &CycleState {
        &self.summary_cycle
    }

    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    /// Transactions that pass the quick search, in server order
    pub fn filtered(&self) -> Vec<&Transaction> {
        self.visible.iter().map(|&i| &self.dataset[i]).collect()
    }

    /// Size of the filtered view
    pub fn filtered_count(&self) -> usize {
        self.visible.len()
    }

    /// Transactions on the current page of the filtered view
    pub fn page_items(&self) -> Vec<&Transaction> {
        self.page
            .slice(&self.visible)
            .iter()
            .map(|&i| &self.dataset[i])
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.page.total_pages(self.visible.len())
    }

    pub fn page_controls(&self) -> Vec<PageControl> {
        self.page.controls(self.visible.len())
    }

    fn replace_dataset(&mut self, dataset: Vec<Transaction>) {
        self.dataset = dataset;
        self.refilter();
    }

    fn refilter(&mut self) {
        let needle = self.search.to_lowercase();
        self.visible = self
            .dataset
            .iter()
            .enumerate()
            .filter(|(_, tx)| tx.matches_query(&needle))
            .map(|(i, _)| i)
            .collect();
    }

    /// Runs one transition and returns the effects to execute
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::ApplyFilters(filters) => self
                .apply_filters(filters)
                .unwrap_or_else(|e| vec![Effect::RenderValidation(e.to_string())]),
            Event::ResetFilters { today } => self.reset_filters(today),
            Event::ChangePage(page) => self.change_page(page),
            Event::NextPage => self.change_page(self.page.current_page() + 1),
            Event::PreviousPage => match self.page.current_page().checked_sub(1) {
                Some(page) => self.change_page(page),
                None => Vec::new(),
            },
            Event::Search(query) => self.search(query),
            Event::RefreshTick => self.refresh_tick(),
            Event::SummaryTick => self.summary_tick(),
            Event::RequestSummary => self.request_summary(),
            Event::TransactionsLoaded { token, result } => self.transactions_loaded(token, result),
            Event::SummaryLoaded { token, result } => self.summary_loaded(token, result),
        }
    }

    /// Validates and applies a complete filter set.
    ///
    /// On success the page goes back to 1 and a listing fetch is issued.
    /// A rejected filter leaves the state untouched apart from the
    /// validation message.
    pub fn apply_filters(&mut self, filters: FilterState) -> Result<Vec<Effect>, ValidationError> {
        if let Err(e) = filters.validate() {
            warn!("Rejected filters: {}", e);
            self.validation = Some(e.clone());
            return Err(e);
        }

        self.filters = filters;
        self.validation = None;
        self.page.reset();
        Ok(self.issue_listing_fetch())
    }

    /// Restores the trailing default window ending at `today` and applies it
    pub fn reset_filters(&mut self, today: NaiveDate) -> Vec<Effect> {
        let defaults = FilterState::default_window(today, self.window_days);
        self.apply_filters(defaults)
            .unwrap_or_else(|e| vec![Effect::RenderValidation(e.to_string())])
    }

    fn change_page(&mut self, page: usize) -> Vec<Effect> {
        if self.page.go_to(page, self.visible.len()) {
            vec![Effect::RenderTable]
        } else {
            debug!(
                "Ignoring page {} (valid range 1..={})",
                page,
                self.total_pages()
            );
            Vec::new()
        }
    }

    fn search(&mut self, query: String) -> Vec<Effect> {
        self.search = query.trim().to_string();
        self.refilter();
        self.page.reset();
        vec![Effect::RenderTable]
    }

    fn refresh_tick(&mut self) -> Vec<Effect> {
        if self.listing_requests.is_in_flight() {
            debug!("Listing refresh skipped, previous request still in flight");
            return Vec::new();
        }
        self.issue_listing_fetch()
    }

    fn summary_tick(&mut self) -> Vec<Effect> {
        if self.summary_requests.is_in_flight() {
            debug!("Summary refresh skipped, previous request still in flight");
            return Vec::new();
        }
        self.request_summary()
    }

    fn request_summary(&mut self) -> Vec<Effect> {
        let token = self.summary_requests.issue();
        self.summary_cycle = CycleState::Loading;
        debug!("Requesting summary {}", token);
        vec![Effect::FetchSummary { token }]
    }

    fn issue_listing_fetch(&mut self) -> Vec<Effect> {
        let token = self.listing_requests.issue();
        self.listing = CycleState::Loading;
        debug!("Requesting transactions {}", token);
        vec![Effect::FetchTransactions {
            token,
            filters: self.filters.clone(),
        }]
    }

    fn transactions_loaded(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Transaction>, FetchError>,
    ) -> Vec<Effect> {
        if !self.listing_requests.resolve(token) {
            debug!("Discarding stale transactions response {}", token);
            return Vec::new();
        }

        match result {
            Ok(transactions) => {
                self.replace_dataset(transactions);
                self.page.reset();

                info!(
                    "Loaded {} transactions ({} shown)",
                    self.dataset.len(),
                    self.visible.len()
                );
                self.listing = CycleState::Loaded;
                vec![Effect::RenderTable]
            }
            Err(e) => {
                let message = e.user_message("transactions");
                warn!("Transactions fetch {} failed, keeping previous data: {}", token, e);
                self.listing = CycleState::Error(message.clone());
                vec![Effect::RenderListingError(message)]
            }
        }
    }

    fn summary_loaded(
        &mut self,
        token: RequestToken,
        result: Result<SummaryData, FetchError>,
    ) -> Vec<Effect> {
        if !self.summary_requests.resolve(token) {
            debug!("Discarding stale summary response {}", token);
            return Vec::new();
        }

        match result {
            Ok(summary) => {
                info!(
                    "Loaded summary ({} types, {} months)",
                    summary.by_type.len(),
                    summary.monthly.len()
                );
                self.summary = Some(summary);
                self.summary_cycle = CycleState::Loaded;
                vec![Effect::RenderCharts]
            }
            Err(e) => {
                let message = e.user_message("summary data");
                warn!("Summary fetch {} failed, keeping previous charts: {}", token, e);
                self.summary_cycle = CycleState::Error(message.clone());
                vec![Effect::RenderSummaryError(message)]
            }
        }
    }
}
