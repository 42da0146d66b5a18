//! Event loop that drives `DashboardState` and executes its effects

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::render::{DashboardView, Presenter};
use super::state::{DashboardState, Effect, Event, RequestToken};
use crate::charts::ChartRenderer;
use crate::client::TransactionSource;
use crate::config::models::RefreshConfig;
use crate::error::DashboardError;
use crate::query::FilterState;

/// Cloneable sender for user actions
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    events: UnboundedSender<Event>,
}

impl DashboardHandle {
    pub fn send(&self, event: Event) -> Result<(), DashboardError> {
        self.events.send(event).map_err(|_| DashboardError::Closed)
    }

    pub fn apply_filters(&self, filters: FilterState) -> Result<(), DashboardError> {
        self.send(Event::ApplyFilters(filters))
    }

    pub fn reset_filters(&self, today: NaiveDate) -> Result<(), DashboardError> {
        self.send(Event::ResetFilters { today })
    }

    pub fn change_page(&self, page: usize) -> Result<(), DashboardError> {
        self.send(Event::ChangePage(page))
    }

    pub fn search(&self, query: &str) -> Result<(), DashboardError> {
        self.send(Event::Search(query.to_string()))
    }

    pub fn request_summary(&self) -> Result<(), DashboardError> {
        self.send(Event::RequestSummary)
    }
}

/// Owns the dashboard state and serializes every mutation through one loop.
///
/// Fetches run on spawned tasks and report back through the event channel,
/// so the loop itself never waits on the network.
pub struct DashboardRuntime<S, V, R>
where
    S: TransactionSource + 'static,
    V: DashboardView,
    R: ChartRenderer,
{
    source: Arc<S>,
    state: DashboardState,
    presenter: Presenter<V, R>,
    refresh: RefreshConfig,
    events_tx: UnboundedSender<Event>,
    events_rx: UnboundedReceiver<Event>,
}

impl<S, V, R> DashboardRuntime<S, V, R>
where
    S: TransactionSource + 'static,
    V: DashboardView,
    R: ChartRenderer,
{
    pub fn new(
        source: Arc<S>,
        state: DashboardState,
        presenter: Presenter<V, R>,
        refresh: RefreshConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            state,
            presenter,
            refresh,
            events_tx,
            events_rx,
        }
    }

    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle {
            events: self.events_tx.clone(),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn presenter(&self) -> &Presenter<V, R> {
        &self.presenter
    }

    /// Runs one transition and carries out the resulting effects
    pub fn dispatch(&mut self, event: Event) {
        let effects = self.state.handle(event);
        for effect in effects {
            if let Some(fetch) = self.presenter.apply(&self.state, effect) {
                self.spawn_fetch(fetch);
            }
        }
    }

    /// Runs `event` and awaits every fetch it triggers in place.
    ///
    /// Render effects are collected instead of executed, for one-shot
    /// callers that draw the final state once.
    pub async fn settle(&mut self, event: Event) -> Vec<Effect> {
        let mut pending = VecDeque::from([event]);
        let mut renders = Vec::new();

        while let Some(event) = pending.pop_front() {
            for effect in self.state.handle(event) {
                match effect {
                    Effect::FetchTransactions { token, filters } => {
                        let result = self.source.fetch_transactions(&filters).await;
                        pending.push_back(Event::TransactionsLoaded { token, result });
                    }
                    Effect::FetchSummary { token } => {
                        let result = self.source.fetch_summary().await;
                        pending.push_back(Event::SummaryLoaded { token, result });
                    }
                    render => renders.push(render),
                }
            }
        }

        renders
    }

    /// Draws the table and both charts from the current state
    pub fn render_all(&mut self) {
        self.presenter.render_table(&self.state);
        self.presenter.render_charts(&self.state);
    }

    fn spawn_fetch(&self, effect: Effect) {
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();

        match effect {
            Effect::FetchTransactions { token, filters } => {
                tokio::spawn(async move {
                    let result = source.fetch_transactions(&filters).await;
                    post(&events, Event::TransactionsLoaded { token, result }, token);
                });
            }
            Effect::FetchSummary { token } => {
                tokio::spawn(async move {
                    let result = source.fetch_summary().await;
                    post(&events, Event::SummaryLoaded { token, result }, token);
                });
            }
            other => debug!("Not a fetch effect: {:?}", other),
        }
    }

    /// Loads the default window and the summary, then processes events,
    /// refresh ticks and user actions until `shutdown` resolves.
    pub async fn run<F>(&mut self, today: NaiveDate, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting dashboard against source '{}' (refresh {})",
            self.source.name(),
            if self.refresh.enabled { "on" } else { "off" }
        );

        self.dispatch(Event::ResetFilters { today });
        self.dispatch(Event::RequestSummary);

        let mut listing_interval = interval(Duration::from_secs(
            self.refresh.transactions_interval_secs.max(1),
        ));
        let mut summary_interval =
            interval(Duration::from_secs(self.refresh.summary_interval_secs.max(1)));
        listing_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        summary_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        listing_interval.tick().await; // Skip first tick
        summary_interval.tick().await;

        let refresh_enabled = self.refresh.enabled;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                Some(event) = self.events_rx.recv() => self.dispatch(event),
                _ = listing_interval.tick(), if refresh_enabled => {
                    self.dispatch(Event::RefreshTick)
                }
                _ = summary_interval.tick(), if refresh_enabled => {
                    self.dispatch(Event::SummaryTick)
                }
                _ = &mut shutdown => {
                    info!("Dashboard shutting down");
                    break;
                }
            }
        }
    }
}

fn post(events: &UnboundedSender<Event>, event: Event, token: RequestToken) {
    if events.send(event).is_err() {
        warn!("Dashboard stopped before response {} arrived", token);
    }
}
