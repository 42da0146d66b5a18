//! Projection of dashboard state into what the views draw, and the
//! presenter that carries out render effects.

use serde::Serialize;
use tracing::debug;

use super::state::{DashboardState, Effect};
use crate::charts::{ChartAdapter, ChartRenderer};
use crate::constants::display;
use crate::format::{format_currency_in, format_date, format_type, truncate};
use crate::pagination::PageControl;

/// One rendered row of the transaction table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub party: String,
    /// Truncated note shown in the cell
    pub note: String,
    /// Untruncated note, for a tooltip or detail view
    pub note_full: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub note_max_len: usize,
    pub currency_code: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            note_max_len: display::DEFAULT_NOTE_MAX_LEN,
            currency_code: display::DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

/// Rows for the current page of the filtered view
pub fn table_rows(state: &DashboardState, options: &RenderOptions) -> Vec<TableRow> {
    state
        .page_items()
        .into_iter()
        .map(|tx| TableRow {
            date: format_date(tx.date.as_deref()),
            kind: format_type(tx.kind.code()),
            amount: format_currency_in(&options.currency_code, tx.amount),
            party: tx
                .counterparty
                .clone()
                .unwrap_or_else(|| display::NOT_AVAILABLE.to_string()),
            note: truncate(tx.note.as_deref(), options.note_max_len),
            note_full: tx.note.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn pagination_controls(state: &DashboardState) -> Vec<PageControl> {
    state.page_controls()
}

/// Number of transactions in the filtered view
pub fn transaction_count(state: &DashboardState) -> usize {
    state.filtered_count()
}

/// The table side of the dashboard.
///
/// An empty `rows` slice means the view should show
/// [`display::EMPTY_TABLE_MESSAGE`].
pub trait DashboardView {
    fn render_table(&mut self, rows: &[TableRow], total: usize);

    fn render_pagination(&mut self, controls: &[PageControl]);

    fn render_listing_error(&mut self, message: &str);

    fn render_validation(&mut self, message: &str);
}

/// Applies render effects to a table view and a chart adapter
pub struct Presenter<V: DashboardView, R: ChartRenderer> {
    view: V,
    charts: ChartAdapter<R>,
    options: RenderOptions,
}

impl<V: DashboardView, R: ChartRenderer> Presenter<V, R> {
    pub fn new(view: V, renderer: R, options: RenderOptions) -> Self {
        Self {
            view,
            charts: ChartAdapter::new(renderer),
            options,
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn charts(&self) -> &ChartAdapter<R> {
        &self.charts
    }

    /// Draws the table, count and pagination bar from `state`
    pub fn render_table(&mut self, state: &DashboardState) {
        let rows = table_rows(state, &self.options);
        self.view.render_table(&rows, transaction_count(state));
        self.view.render_pagination(&pagination_controls(state));
    }

    /// Redraws both charts from the last loaded summary
    pub fn render_charts(&mut self, state: &DashboardState) {
        match state.summary() {
            Some(summary) => {
                self.charts.render_type_chart(&summary.by_type);
                self.charts.render_monthly_chart(&summary.monthly);
            }
            None => debug!("No summary loaded yet, charts left untouched"),
        }
    }

    /// Executes `effect` if it is a render effect.
    ///
    /// Fetch effects are returned unchanged for the caller to run.
    pub fn apply(&mut self, state: &DashboardState, effect: Effect) -> Option<Effect> {
        match effect {
            Effect::RenderTable => self.render_table(state),
            Effect::RenderCharts => self.render_charts(state),
            Effect::RenderListingError(message) => self.view.render_listing_error(&message),
            Effect::RenderSummaryError(message) => self.charts.render_error(&message),
            Effect::RenderValidation(message) => self.view.render_validation(&message),
            fetch @ (Effect::FetchTransactions { .. } | Effect::FetchSummary { .. }) => {
                return Some(fetch)
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::ChartSlot;
    use crate::models::TransactionType;
    use crate::test_utils::{RecordingChartRenderer, RecordingView, SummaryBuilder, TransactionBuilder};

    fn dataset(count: usize) -> Vec<crate::models::Transaction> {
        (0..count)
            .map(|i| {
                TransactionBuilder::new()
                    .with_id(&format!("tx-{i}"))
                    .with_amount(1000 + i as i64)
                    .build()
            })
            .collect()
    }

    #[test]
    fn test_rows_are_formatted_for_display() {
        let tx = TransactionBuilder::new()
            .with_type(TransactionType::CashPower)
            .with_amount(1500)
            .with_counterparty("REG")
            .with_date("2024-01-05 10:00:00")
            .with_note("A very long note that keeps going")
            .build();
        let state = DashboardState::new(10, 30).with_dataset(vec![tx]);
        let options = RenderOptions {
            note_max_len: 6,
            ..RenderOptions::default()
        };

        let rows = table_rows(&state, &options);
        assert_eq!(
            rows,
            vec![TableRow {
                date: "Jan 5, 2024".to_string(),
                kind: "Cash Power".to_string(),
                amount: "RWF 1,500".to_string(),
                party: "REG".to_string(),
                note: "A very...".to_string(),
                note_full: "A very long note that keeps going".to_string(),
            }]
        );
    }

    #[test]
    fn test_missing_fields_render_placeholders() {
        let tx = TransactionBuilder::new().without_amount().without_date().build();
        let state = DashboardState::default().with_dataset(vec![tx]);

        let rows = table_rows(&state, &RenderOptions::default());
        assert_eq!(rows[0].date, "N/A");
        assert_eq!(rows[0].amount, "N/A");
        assert_eq!(rows[0].party, "N/A");
        assert_eq!(rows[0].note, "");
    }

    #[test]
    fn test_rows_follow_current_page() {
        let mut state = DashboardState::new(10, 30).with_dataset(dataset(25));
        state.handle(crate::dashboard::Event::ChangePage(3));

        let rows = table_rows(&state, &RenderOptions::default());
        assert_eq!(rows.len(), 5);
        assert_eq!(transaction_count(&state), 25);
        assert_eq!(pagination_controls(&state).len(), 5);
    }

    #[test]
    fn test_empty_dataset_has_no_rows_or_controls() {
        let state = DashboardState::default();
        assert!(table_rows(&state, &RenderOptions::default()).is_empty());
        assert!(pagination_controls(&state).is_empty());
        assert_eq!(transaction_count(&state), 0);
    }

    #[test]
    fn test_presenter_routes_effects() {
        let state = DashboardState::new(10, 30)
            .with_dataset(dataset(12))
            .with_summary(SummaryBuilder::new().with_type("airtime", 500.0).with_month("2024-01", 500.0).build());
        let mut presenter = Presenter::new(
            RecordingView::default(),
            RecordingChartRenderer::default(),
            RenderOptions::default(),
        );

        assert_eq!(presenter.apply(&state, Effect::RenderTable), None);
        assert_eq!(presenter.apply(&state, Effect::RenderCharts), None);
        assert_eq!(
            presenter.apply(&state, Effect::RenderSummaryError("charts down".into())),
            None
        );
        let fetch = Effect::FetchSummary {
            token: match state.clone().handle(crate::dashboard::Event::RequestSummary).pop() {
                Some(Effect::FetchSummary { token }) => token,
                other => panic!("unexpected effect {other:?}"),
            },
        };
        assert_eq!(presenter.apply(&state, fetch.clone()), Some(fetch));

        let view = presenter.view();
        assert_eq!(view.tables.len(), 1);
        assert_eq!(view.tables[0].0.len(), 10);
        assert_eq!(view.tables[0].1, 12);
        assert_eq!(view.pagination.len(), 1);
        assert!(presenter.charts().is_live(ChartSlot::ByType));
        assert!(presenter.charts().is_live(ChartSlot::Monthly));
        assert_eq!(presenter.charts().renderer().errors, vec!["charts down"]);
    }

    #[test]
    fn test_render_charts_without_summary_is_noop() {
        let state = DashboardState::default();
        let mut presenter = Presenter::new(
            RecordingView::default(),
            RecordingChartRenderer::default(),
            RenderOptions::default(),
        );
        presenter.render_charts(&state);
        assert!(presenter.charts().renderer().created.is_empty());
    }
}
