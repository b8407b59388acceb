//! HR Dashboard Main Application
//! Main window with control panel and dashboard view.

use crate::config::DashboardConfig;
use crate::data::{load_prepared, DataSource, PreparedCache};
use crate::export::ExportFormat;
use crate::gui::{ControlPanel, ControlPanelAction, DashboardSession, DashboardView};
use chrono::{Local, NaiveDate};
use egui::{Color32, RichText, SidePanel};
use std::fs;
use std::path::Path;

/// What the central panel shows.
enum LoadState {
    Empty,
    Failed(String),
    Loaded(DashboardSession),
}

/// Main application window.
pub struct HrDashboardApp {
    config: DashboardConfig,
    cache: PreparedCache,
    today: NaiveDate,
    control_panel: ControlPanel,
    state: LoadState,
}

impl HrDashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(&config.default_excel_path),
            config,
            cache: PreparedCache::new(),
            today: Local::now().date_naive(),
            state: LoadState::Empty,
        };

        let default_path = app.config.default_excel_path.clone();
        app.load(DataSource::Path(default_path));
        app
    }

    /// Load and prepare a source, replacing whatever is shown.
    fn load(&mut self, source: DataSource) {
        // the cache is per calendar day
        let today = Local::now().date_naive();
        if today != self.today {
            self.today = today;
            self.cache.clear();
        }

        match load_prepared(&source, &self.config.columns, self.today, &mut self.cache) {
            Ok(prepared) => {
                let session = DashboardSession::build(
                    &source,
                    prepared,
                    self.config.histogram_bins,
                    &self.config.columns,
                );
                self.control_panel
                    .set_status(&format!("Loaded {}", source.display_name()));
                self.control_panel.export_enabled = true;
                self.state = LoadState::Loaded(session);
            }
            Err(e) => {
                tracing::error!(source = %source.display_name(), error = %e, "load failed");
                self.control_panel.set_status(&format!("Error: {}", e));
                self.control_panel.export_enabled = false;
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    fn handle_upload(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Excel Files", &["xlsx"])
            .pick_file()
        else {
            return;
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        match fs::read(&path) {
            Ok(bytes) => {
                self.control_panel.uploaded_name = Some(file_name.clone());
                self.load(DataSource::Upload { file_name, bytes });
            }
            Err(e) => {
                self.control_panel
                    .set_status(&format!("Error: failed to read {}: {}", file_name, e));
            }
        }
    }

    fn handle_load_path(&mut self) {
        self.control_panel.uploaded_name = None;
        let path = self.control_panel.path();
        self.load(DataSource::Path(path));
    }

    fn handle_export(&mut self, format: ExportFormat) {
        let LoadState::Loaded(session) = &self.state else {
            self.control_panel.set_status("No data to export");
            return;
        };

        let file_name = match format {
            ExportFormat::Csv => &self.config.export.csv_file_name,
            ExportFormat::Xlsx => &self.config.export.xlsx_file_name,
        };

        // Ask user for output location
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter(format.label(), &[format.extension()])
            .set_file_name(file_name)
            .save_file()
        else {
            return;
        };

        let bytes = match format.encode(&session.prepared.frame, &self.config.export.sheet_name) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.control_panel
                    .set_status(&format!("Error: export failed: {}", e));
                return;
            }
        };

        match fs::write(&output_path, &bytes) {
            Ok(()) => {
                tracing::info!(path = %output_path.display(), size = bytes.len(), "export saved");
                self.control_panel
                    .set_status(&format!("Saved {}", output_path.display()));
                if self.config.open_after_export {
                    Self::open_exported(&output_path);
                }
            }
            Err(e) => {
                self.control_panel
                    .set_status(&format!("Error: failed to write file: {}", e));
            }
        }
    }

    fn open_exported(path: &Path) {
        if let Err(e) = open::that(path) {
            tracing::warn!(path = %path.display(), error = %e, "could not open exported file");
        }
    }
}

impl eframe::App for HrDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::Upload => self.handle_upload(),
                        ControlPanelAction::LoadPath => self.handle_load_path(),
                        ControlPanelAction::ExportCsv => self.handle_export(ExportFormat::Csv),
                        ControlPanelAction::ExportXlsx => self.handle_export(ExportFormat::Xlsx),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| match &self.state {
            LoadState::Loaded(session) => DashboardView::show(ui, session),
            LoadState::Failed(message) => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new(message)
                            .size(16.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                });
            }
            LoadState::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
        });
    }
}
