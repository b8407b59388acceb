//! HR Dashboard - Employee spreadsheet dashboard
//!
//! Desktop window showing headcount, payroll and demographic charts for an
//! HR spreadsheet, with CSV and Excel downloads.

use anyhow::Context;
use eframe::egui;
use hr_dashboard::config::DashboardConfig;
use hr_dashboard::gui::HrDashboardApp;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hr_dashboard=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = DashboardConfig::discover().context("failed to load configuration")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("HR Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "HR Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(HrDashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to start window: {e}"))
}
