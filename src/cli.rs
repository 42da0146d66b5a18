use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::client::{DataClient, TransactionSource};
use crate::config::DashboardConfig;
use crate::dashboard::{
    DashboardHandle, DashboardRuntime, DashboardState, Effect, Event, Presenter, RenderOptions,
};
use crate::error::DashboardError;
use crate::models::TransactionType;
use crate::query::FilterState;
use crate::view::commands::HELP_TEXT;
use crate::view::{parse_command, Command, ConsoleView};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "momo-dash - a terminal dashboard for mobile-money transactions",
    long_about = "momo-dash fetches transaction records and aggregate totals from a MoMo \
                  transaction API and shows them as a paginated table with per-type and \
                  monthly charts. The live dashboard refreshes itself on a timer."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the live dashboard (default behavior)
    Run,
    /// Load one filtered view, print it and exit
    Show(ShowArgs),
    /// Query the server-side search endpoint
    Search {
        /// Text to search for
        query: String,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct ShowArgs {
    /// Transaction type code (e.g. airtime, cash_power)
    #[arg(long = "type", value_name = "TYPE")]
    pub kind: Option<TransactionType>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    #[arg(long)]
    pub min_amount: Option<Decimal>,

    #[arg(long)]
    pub max_amount: Option<Decimal>,

    /// Page of the table to print
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Narrow the table to rows matching this text
    #[arg(long)]
    pub search: Option<String>,
}

impl ShowArgs {
    /// Filters given on the command line, or the default window when none are
    pub fn filters(&self, today: NaiveDate, window_days: u32) -> FilterState {
        let filters = FilterState {
            kind: self
                .kind
                .clone()
                .filter(|kind| !kind.code().trim().is_empty()),
            start_date: self.start_date,
            end_date: self.end_date,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        };

        if filters.is_empty() {
            FilterState::default_window(today, window_days)
        } else {
            filters
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn render_options(config: &DashboardConfig) -> RenderOptions {
    RenderOptions {
        note_max_len: config.display.note_max_len,
        currency_code: config.display.currency_code.clone(),
    }
}

type ConsolePresenter = Presenter<ConsoleView<io::Stdout>, ConsoleView<io::Stdout>>;

fn console_presenter(config: &DashboardConfig) -> ConsolePresenter {
    Presenter::new(
        ConsoleView::new(io::stdout()),
        ConsoleView::new(io::stdout()),
        render_options(config),
    )
}

pub async fn handle_command(command: Option<Commands>, config: DashboardConfig) -> Result<()> {
    match command.unwrap_or(Commands::Run) {
        Commands::Run => run_dashboard(config).await,
        Commands::Show(args) => Ok(show_once(config, args).await?),
        Commands::Search { query } => Ok(search(config, &query).await?),
    }
}

async fn run_dashboard(config: DashboardConfig) -> Result<()> {
    let source = Arc::new(DataClient::new(&config.api)?);
    info!("Connecting to {}", source.base_url());

    let state = DashboardState::new(config.display.page_size, config.display.default_window_days);
    let mut runtime = DashboardRuntime::new(
        source,
        state,
        console_presenter(&config),
        config.refresh.clone(),
    );

    let (quit_tx, quit_rx) = oneshot::channel::<()>();
    tokio::spawn(read_commands(runtime.handle(), spawn_stdin_reader(), quit_tx));

    println!("{HELP_TEXT}");
    runtime
        .run(today(), async move {
            tokio::select! {
                _ = quit_rx => {}
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                }
            }
        })
        .await;

    Ok(())
}

/// What the input loop does after one line has been handled
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Help,
    Quit,
}

/// Parses one input line and sends its events to the dashboard
fn forward_line(
    handle: &DashboardHandle,
    line: &str,
    today: NaiveDate,
) -> Result<LineOutcome, DashboardError> {
    match parse_command(line)? {
        None => Ok(LineOutcome::Continue),
        Some(Command::Help) => Ok(LineOutcome::Help),
        Some(Command::Quit) => Ok(LineOutcome::Quit),
        Some(command) => {
            for event in command.into_events(today) {
                handle.send(event)?;
            }
            Ok(LineOutcome::Continue)
        }
    }
}

/// Reads stdin on a detached thread and hands each line to the returned channel.
///
/// A read still blocked on this thread does not hold up process exit.
fn spawn_stdin_reader() -> UnboundedReceiver<String> {
    let (lines_tx, lines_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            match line {
                Ok(line) => {
                    if lines_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }
    });

    lines_rx
}

/// Forwards input lines to the dashboard until `quit` or end of input
async fn read_commands(
    handle: DashboardHandle,
    mut lines: UnboundedReceiver<String>,
    quit: oneshot::Sender<()>,
) {
    while let Some(line) = lines.recv().await {
        match forward_line(&handle, &line, today()) {
            Ok(LineOutcome::Continue) => {}
            Ok(LineOutcome::Help) => println!("{HELP_TEXT}"),
            Ok(LineOutcome::Quit) => break,
            Err(DashboardError::Command(e)) => println!("{e}"),
            Err(e) => {
                warn!("{}", e);
                break;
            }
        }
    }

    let _ = quit.send(());
}

async fn show_once(config: DashboardConfig, args: ShowArgs) -> Result<(), DashboardError> {
    let filters = args.filters(today(), config.display.default_window_days);
    filters.validate()?;

    let source = Arc::new(DataClient::new(&config.api)?);
    let state = DashboardState::new(config.display.page_size, config.display.default_window_days);
    let mut runtime = DashboardRuntime::new(
        source,
        state,
        console_presenter(&config),
        config.refresh.clone(),
    );

    let mut outcome = runtime.settle(Event::ApplyFilters(filters)).await;
    outcome.extend(runtime.settle(Event::RequestSummary).await);
    if let Some(query) = args.search {
        runtime.settle(Event::Search(query)).await;
    }
    if args.page != 1 && runtime.settle(Event::ChangePage(args.page)).await.is_empty() {
        warn!(
            "Page {} does not exist, showing page 1 of {}",
            args.page,
            runtime.state().total_pages()
        );
    }

    for effect in outcome {
        match effect {
            Effect::RenderListingError(message) => return Err(DashboardError::Listing(message)),
            Effect::RenderSummaryError(message) => warn!("{}", message),
            _ => {}
        }
    }

    runtime.render_all();
    Ok(())
}

async fn search(config: DashboardConfig, query: &str) -> Result<(), DashboardError> {
    let client = DataClient::new(&config.api)?;
    let state = search_state(&client, query, config.display.default_window_days).await?;

    let mut presenter = console_presenter(&config);
    presenter.render_table(&state);
    Ok(())
}

/// Runs a server-side search and puts every match on a single page
pub async fn search_state<S: TransactionSource>(
    source: &S,
    query: &str,
    window_days: u32,
) -> Result<DashboardState, DashboardError> {
    let results = source.search(query).await?;
    info!("Search '{}' returned {} transactions", query, results.len());

    Ok(DashboardState::new(results.len().max(1), window_days).with_dataset(results))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::FetchError;
    use crate::config::models::RefreshConfig;
    use crate::test_utils::{
        MockTransactionSource, RecordingChartRenderer, RecordingView, TransactionBuilder,
    };

    type TestRuntime = DashboardRuntime<MockTransactionSource, RecordingView, RecordingChartRenderer>;

    fn test_runtime() -> TestRuntime {
        DashboardRuntime::new(
            Arc::new(MockTransactionSource::new()),
            DashboardState::new(10, 30),
            Presenter::new(
                RecordingView::default(),
                RecordingChartRenderer::default(),
                RenderOptions::default(),
            ),
            RefreshConfig {
                enabled: false,
                ..RefreshConfig::default()
            },
        )
    }

    #[test]
    fn test_empty_type_flag_keeps_default_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let cli = Cli::parse_from(["momo-dash", "show", "--type", ""]);

        let Some(Commands::Show(args)) = cli.command else {
            panic!("expected show command");
        };
        assert_eq!(args.filters(today, 30), FilterState::default_window(today, 30));
    }

    #[test]
    fn test_forward_line_outcomes() {
        let runtime = test_runtime();
        let handle = runtime.handle();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        assert_eq!(forward_line(&handle, "", today).unwrap(), LineOutcome::Continue);
        assert_eq!(forward_line(&handle, "help", today).unwrap(), LineOutcome::Help);
        assert_eq!(forward_line(&handle, "q", today).unwrap(), LineOutcome::Quit);
        assert_eq!(forward_line(&handle, "next", today).unwrap(), LineOutcome::Continue);
        assert!(matches!(
            forward_line(&handle, "launch", today),
            Err(DashboardError::Command(_))
        ));

        drop(runtime);
        assert!(matches!(
            forward_line(&handle, "next", today),
            Err(DashboardError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_quit_line_stops_dashboard_while_input_stays_open() {
        let mut runtime = test_runtime();
        let (lines_tx, lines_rx) = mpsc::unbounded_channel();
        let (quit_tx, quit_rx) = oneshot::channel();
        tokio::spawn(read_commands(runtime.handle(), lines_rx, quit_tx));

        for line in ["bogus", "filter type=airtime", "quit"] {
            lines_tx.send(line.to_string()).unwrap();
        }

        tokio::time::timeout(
            Duration::from_secs(5),
            runtime.run(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), async move {
                let _ = quit_rx.await;
            }),
        )
        .await
        .expect("dashboard should stop after quit");

        assert_eq!(
            runtime.state().filters().kind,
            Some(TransactionType::Airtime)
        );
        drop(lines_tx);
    }

    #[tokio::test]
    async fn test_show_rejects_inverted_dates_before_fetching() {
        let args = ShowArgs {
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            page: 1,
            ..ShowArgs::default()
        };

        let result = show_once(DashboardConfig::default(), args).await;
        assert!(matches!(result, Err(DashboardError::Validation(_))));
    }

    #[tokio::test]
    async fn test_show_fails_when_listing_fails() {
        let mut server = mockito::Server::new_async().await;
        let _listing = server
            .mock("GET", "/api/transactions")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let mut config = DashboardConfig::default();
        config.api.base_url = server.url();
        let args = ShowArgs {
            kind: Some(TransactionType::Airtime),
            page: 1,
            ..ShowArgs::default()
        };

        let result = show_once(config, args).await;
        assert!(matches!(result, Err(DashboardError::Listing(message)) if message.contains("500")));
    }

    #[tokio::test]
    async fn test_search_state_puts_matches_on_one_page() {
        let source = MockTransactionSource::new();
        source.set_search_results(Ok(TransactionBuilder::batch("jane", 14)));

        let state = search_state(&source, "jane", 30).await.unwrap();

        assert_eq!(source.search_queries(), vec!["jane".to_string()]);
        assert_eq!(state.dataset().len(), 14);
        assert_eq!(state.total_pages(), 1);
        assert_eq!(state.page_items().len(), 14);
    }

    #[tokio::test]
    async fn test_search_state_reports_fetch_errors() {
        let source = MockTransactionSource::new();
        source.set_search_results(Err(FetchError::Status(503)));

        let result = search_state(&source, "jane", 30).await;
        assert!(matches!(
            result,
            Err(DashboardError::Fetch(FetchError::Status(503)))
        ));
    }

    #[test]
    fn test_show_defaults_to_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let args = ShowArgs::default();
        assert_eq!(args.filters(today, 30), FilterState::default_window(today, 30));
    }

    #[test]
    fn test_show_args_parse_into_filters() {
        let cli = Cli::parse_from([
            "momo-dash",
            "show",
            "--type",
            "airtime",
            "--start-date",
            "2024-01-01",
            "--max-amount",
            "2500.50",
            "--page",
            "2",
        ]);

        let Some(Commands::Show(args)) = cli.command else {
            panic!("expected show command");
        };
        let filters = args.filters(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), 30);
        assert_eq!(filters.kind, Some(TransactionType::Airtime));
        assert_eq!(filters.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filters.end_date, None);
        assert_eq!(filters.max_amount, Some(Decimal::new(250050, 2)));
        assert_eq!(args.page, 2);
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::parse_from(["momo-dash", "search", "jane", "--config", "dash.yaml"]);
        assert_eq!(cli.config, Some(PathBuf::from("dash.yaml")));
        assert!(matches!(cli.command, Some(Commands::Search { query }) if query == "jane"));
    }
}
