//! Mock implementations for testing

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::charts::{ChartDataset, ChartRenderer, ChartSlot};
use crate::client::{FetchError, TransactionSource};
use crate::dashboard::{DashboardView, TableRow};
use crate::models::{SummaryData, Transaction};
use crate::pagination::PageControl;
use crate::query::FilterState;

/// A queued response, optionally held back until its gate is released
struct Scripted<T> {
    result: Result<T, FetchError>,
    gate: Option<oneshot::Receiver<()>>,
}

impl<T> Scripted<T> {
    async fn resolve(self) -> Result<T, FetchError> {
        if let Some(gate) = self.gate {
            // A dropped sender releases the response as well
            let _ = gate.await;
        }
        self.result
    }
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Transaction source that replays scripted responses in order.
///
/// Once a queue runs dry the source answers with an empty listing or an
/// empty summary.
#[derive(Default)]
pub struct MockTransactionSource {
    listings: Mutex<VecDeque<Scripted<Vec<Transaction>>>>,
    summaries: Mutex<VecDeque<Scripted<SummaryData>>>,
    search_results: Mutex<Option<Result<Vec<Transaction>, FetchError>>>,
    listing_calls: Mutex<Vec<FilterState>>,
    search_queries: Mutex<Vec<String>>,
    summary_calls: AtomicUsize,
    completed_listings: AtomicUsize,
    completed_summaries: AtomicUsize,
}

impl MockTransactionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a listing response that is returned immediately
    pub fn push_listing(&self, result: Result<Vec<Transaction>, FetchError>) {
        locked(&self.listings).push_back(Scripted { result, gate: None });
    }

    /// Queue a listing response that waits until the returned sender fires
    pub fn push_gated_listing(
        &self,
        result: Result<Vec<Transaction>, FetchError>,
    ) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        locked(&self.listings).push_back(Scripted {
            result,
            gate: Some(gate),
        });
        release
    }

    pub fn push_summary(&self, result: Result<SummaryData, FetchError>) {
        locked(&self.summaries).push_back(Scripted { result, gate: None });
    }

    pub fn push_gated_summary(&self, result: Result<SummaryData, FetchError>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        locked(&self.summaries).push_back(Scripted {
            result,
            gate: Some(gate),
        });
        release
    }

    pub fn set_search_results(&self, result: Result<Vec<Transaction>, FetchError>) {
        *locked(&self.search_results) = Some(result);
    }

    /// Filters of every listing request, in call order
    pub fn listing_calls(&self) -> Vec<FilterState> {
        locked(&self.listing_calls).clone()
    }

    pub fn search_queries(&self) -> Vec<String> {
        locked(&self.search_queries).clone()
    }

    pub fn summary_call_count(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }

    /// Listing requests that have returned to the caller
    pub fn completed_listings(&self) -> usize {
        self.completed_listings.load(Ordering::SeqCst)
    }

    pub fn completed_summaries(&self) -> usize {
        self.completed_summaries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionSource for MockTransactionSource {
    async fn fetch_transactions(
        &self,
        filters: &FilterState,
    ) -> Result<Vec<Transaction>, FetchError> {
        locked(&self.listing_calls).push(filters.clone());
        let scripted = locked(&self.listings).pop_front();

        let result = match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(Vec::new()),
        };
        self.completed_listings.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn fetch_summary(&self) -> Result<SummaryData, FetchError> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = locked(&self.summaries).pop_front();

        let result = match scripted {
            Some(scripted) => scripted.resolve().await,
            None => Ok(SummaryData::default()),
        };
        self.completed_summaries.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn search(&self, query: &str) -> Result<Vec<Transaction>, FetchError> {
        locked(&self.search_queries).push(query.to_string());
        locked(&self.search_results)
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Table view that records every call
#[derive(Debug, Default)]
pub struct RecordingView {
    /// Rendered rows and the reported transaction count, per call
    pub tables: Vec<(Vec<TableRow>, usize)>,
    pub pagination: Vec<Vec<PageControl>>,
    pub listing_errors: Vec<String>,
    pub validations: Vec<String>,
}

impl RecordingView {
    pub fn last_table(&self) -> Option<&(Vec<TableRow>, usize)> {
        self.tables.last()
    }
}

impl DashboardView for RecordingView {
    fn render_table(&mut self, rows: &[TableRow], total: usize) {
        self.tables.push((rows.to_vec(), total));
    }

    fn render_pagination(&mut self, controls: &[PageControl]) {
        self.pagination.push(controls.to_vec());
    }

    fn render_listing_error(&mut self, message: &str) {
        self.listing_errors.push(message.to_string());
    }

    fn render_validation(&mut self, message: &str) {
        self.validations.push(message.to_string());
    }
}

/// Chart renderer whose handles are creation indices
#[derive(Debug, Default)]
pub struct RecordingChartRenderer {
    pub created: Vec<(ChartSlot, ChartDataset)>,
    pub destroyed: Vec<usize>,
    pub errors: Vec<String>,
    live: HashSet<usize>,
}

impl RecordingChartRenderer {
    /// Instances created and not yet destroyed
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Most recent dataset drawn into `slot`
    pub fn last_dataset(&self, slot: ChartSlot) -> Option<&ChartDataset> {
        self.created
            .iter()
            .rev()
            .find(|(s, _)| *s == slot)
            .map(|(_, dataset)| dataset)
    }
}

impl ChartRenderer for RecordingChartRenderer {
    type Handle = usize;

    fn create(&mut self, slot: ChartSlot, dataset: &ChartDataset) -> usize {
        let handle = self.created.len();
        self.created.push((slot, dataset.clone()));
        self.live.insert(handle);
        handle
    }

    fn destroy(&mut self, handle: usize) {
        self.live.remove(&handle);
        self.destroyed.push(handle);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}
