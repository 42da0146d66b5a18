//! Conversion of summary data into chart datasets and chart instance lifetime

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::format::format_type;
use crate::models::{MonthlyTotal, TypeTotal};

/// Which of the two dashboard charts an instance belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartSlot {
    ByType,
    Monthly,
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSlot::ByType => f.write_str("by-type"),
            ChartSlot::Monthly => f.write_str("monthly"),
        }
    }
}

/// Labels and values handed to a chart renderer, in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartDataset {
    /// Dataset for the by-type breakdown, labels translated to display names
    pub fn from_type_totals(by_type: &[TypeTotal]) -> Self {
        Self {
            labels: by_type.iter().map(|t| format_type(t.kind.code())).collect(),
            values: by_type.iter().map(|t| t.total.unwrap_or(0.0)).collect(),
        }
    }

    /// Dataset for the monthly volume chart
    pub fn from_monthly_totals(monthly: &[MonthlyTotal]) -> Self {
        Self {
            labels: monthly.iter().map(|m| m.month.clone()).collect(),
            values: monthly.iter().map(|m| m.total.unwrap_or(0.0)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A charting backend that owns live chart instances
pub trait ChartRenderer {
    type Handle;

    /// Create and draw a new chart instance
    fn create(&mut self, slot: ChartSlot, dataset: &ChartDataset) -> Self::Handle;

    /// Release a chart instance previously returned by `create`
    fn destroy(&mut self, handle: Self::Handle);

    /// Show a message in place of the chart area
    fn show_error(&mut self, message: &str);
}

/// Keeps at most one live instance per chart slot
pub struct ChartAdapter<R: ChartRenderer> {
    renderer: R,
    type_chart: Option<R::Handle>,
    monthly_chart: Option<R::Handle>,
}

impl<R: ChartRenderer> ChartAdapter<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            type_chart: None,
            monthly_chart: None,
        }
    }

    fn held(&mut self, slot: ChartSlot) -> &mut Option<R::Handle> {
        match slot {
            ChartSlot::ByType => &mut self.type_chart,
            ChartSlot::Monthly => &mut self.monthly_chart,
        }
    }

    fn replace(&mut self, slot: ChartSlot, dataset: &ChartDataset) {
        if let Some(previous) = self.held(slot).take() {
            debug!("Destroying previous {} chart", slot);
            self.renderer.destroy(previous);
        }
        let handle = self.renderer.create(slot, dataset);
        *self.held(slot) = Some(handle);
    }

    /// Redraw the by-type chart, destroying the previous instance first
    pub fn render_type_chart(&mut self, by_type: &[TypeTotal]) {
        self.replace(ChartSlot::ByType, &ChartDataset::from_type_totals(by_type));
    }

    /// Redraw the monthly chart, destroying the previous instance first
    pub fn render_monthly_chart(&mut self, monthly: &[MonthlyTotal]) {
        self.replace(
            ChartSlot::Monthly,
            &ChartDataset::from_monthly_totals(monthly),
        );
    }

    /// Show a message in the chart area, keeping any live instances
    pub fn render_error(&mut self, message: &str) {
        self.renderer.show_error(message);
    }

    /// Destroy the instance held for `slot`, if any
    pub fn clear(&mut self, slot: ChartSlot) {
        if let Some(handle) = self.held(slot).take() {
            self.renderer.destroy(handle);
        }
    }

    pub fn is_live(&self, slot: ChartSlot) -> bool {
        match slot {
            ChartSlot::ByType => self.type_chart.is_some(),
            ChartSlot::Monthly => self.monthly_chart.is_some(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: ChartRenderer> Drop for ChartAdapter<R> {
    fn drop(&mut self) {
        self.clear(ChartSlot::ByType);
        self.clear(ChartSlot::Monthly);
    }
}
