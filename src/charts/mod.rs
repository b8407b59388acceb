//! Charts module - chart series and rendering

mod plotter;
mod series;

pub use plotter::{ChartPlotter, PALETTE};
pub use series::{ChartSeries, DashboardCharts, HistogramBin, DEFAULT_HISTOGRAM_BINS};
