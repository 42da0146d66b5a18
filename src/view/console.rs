//! Plain-text terminal rendering of the table and charts

use std::collections::HashMap;
use std::io::Write;

use tracing::warn;

use crate::charts::{ChartDataset, ChartRenderer, ChartSlot};
use crate::constants::display::{CHART_BAR_WIDTH, EMPTY_TABLE_MESSAGE};
use crate::dashboard::{DashboardView, TableRow};
use crate::pagination::PageControl;

/// Aligned text grid with a header row and a separator line
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl TextTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.chars().count()).collect(),
        }
    }

    /// Add a row; cells past the header count are dropped
    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut output = self.render_row(&self.headers);
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');
        for row in &self.rows {
            output.push_str(&self.render_row(row));
            output.push('\n');
        }
        output
    }

    fn render_row(&self, row: &[String]) -> String {
        self.col_widths
            .iter()
            .zip(row)
            .map(|(&width, cell)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

/// Horizontal bars scaled so the largest value spans `width` cells
pub fn render_bars(dataset: &ChartDataset, width: usize) -> String {
    let max = dataset
        .values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);
    let label_width = dataset
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (label, &value) in dataset.labels.iter().zip(&dataset.values) {
        let cells = if max > 0.0 && value.is_finite() && value > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        output.push_str(&format!(
            "{label:<label_width$} | {} {value:.0}\n",
            "#".repeat(cells.min(width))
        ));
    }
    output
}

/// Terminal view writing to any `Write` sink.
///
/// Also acts as the chart backend. Each created chart gets a numeric
/// handle that stays in `live` until destroyed.
pub struct ConsoleView<W: Write> {
    out: W,
    next_handle: u64,
    live: HashMap<u64, ChartSlot>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            next_handle: 0,
            live: HashMap::new(),
        }
    }

    /// Chart instances created and not yet destroyed
    pub fn live_charts(&self) -> usize {
        self.live.len()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write> DashboardView for ConsoleView<W> {
    fn render_table(&mut self, rows: &[TableRow], total: usize) {
        let mut text = format!("\nTransactions: {total}\n");
        if rows.is_empty() {
            text.push_str(EMPTY_TABLE_MESSAGE);
            text.push('\n');
        } else {
            let mut table = TextTable::new(&["Date", "Type", "Amount", "Party", "Note"]);
            for row in rows {
                table.add_row(vec![
                    row.date.clone(),
                    row.kind.clone(),
                    row.amount.clone(),
                    row.party.clone(),
                    row.note.clone(),
                ]);
            }
            text.push_str(&table.render());
        }
        self.emit(&text);
    }

    fn render_pagination(&mut self, controls: &[PageControl]) {
        if controls.is_empty() {
            return;
        }
        let bar = controls
            .iter()
            .map(|c| {
                if c.is_active {
                    format!("[{}]", c.label)
                } else if c.is_disabled {
                    format!("({})", c.label)
                } else {
                    c.label.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        self.emit(&format!("{bar}\n"));
    }

    fn render_listing_error(&mut self, message: &str) {
        self.emit(&format!("! {message}\n"));
    }

    fn render_validation(&mut self, message: &str) {
        self.emit(&format!("Invalid filters: {message}\n"));
    }
}

impl<W: Write> ChartRenderer for ConsoleView<W> {
    type Handle = u64;

    fn create(&mut self, slot: ChartSlot, dataset: &ChartDataset) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        self.live.insert(handle, slot);

        let title = match slot {
            ChartSlot::ByType => "Volume by type",
            ChartSlot::Monthly => "Monthly volume",
        };
        let body = if dataset.is_empty() {
            "(no data)\n".to_string()
        } else {
            render_bars(dataset, CHART_BAR_WIDTH)
        };
        self.emit(&format!("\n{title}\n{body}"));
        handle
    }

    fn destroy(&mut self, handle: u64) {
        self.live.remove(&handle);
    }

    fn show_error(&mut self, message: &str) {
        self.emit(&format!("! {message}\n"));
    }
}
