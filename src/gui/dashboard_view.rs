//! Dashboard View Widget
//! Central panel: caption, KPI cards, the four charts and the data table.

use crate::charts::{ChartPlotter, DashboardCharts};
use crate::data::{cell_text, ColumnSchema, DataSource, PreparedData};
use crate::gui::format::{format_brl, format_rating, format_years};
use crate::stats::HrIndicators;
use egui::{Color32, RichText, ScrollArea};
use std::sync::Arc;

const CARD_WIDTH: f32 = 170.0;
const CELL_WIDTH: f32 = 130.0;
const ROW_HEIGHT: f32 = 20.0;
const TABLE_HEIGHT: f32 = 400.0;

/// Everything derived from one successful load.
pub struct DashboardSession {
    pub origin: &'static str,
    pub source_name: String,
    pub prepared: Arc<PreparedData>,
    pub indicators: HrIndicators,
    pub charts: DashboardCharts,
    pub columns: Vec<String>,
}

impl DashboardSession {
    pub fn build(
        source: &DataSource,
        prepared: Arc<PreparedData>,
        histogram_bins: usize,
        schema: &ColumnSchema,
    ) -> Self {
        let df = &prepared.frame;
        let indicators = HrIndicators::compute(df, schema);
        let charts = DashboardCharts::build(df, schema, histogram_bins);
        let columns = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self {
            origin: source.origin_label(),
            source_name: source.display_name(),
            prepared,
            indicators,
            charts,
            columns,
        }
    }

    pub fn caption(&self) -> String {
        format!(
            "Loaded via {}. Rows: {} | Columns: {}",
            self.origin,
            self.prepared.frame.height(),
            self.columns.len()
        )
    }

    /// (label, formatted value) for each KPI card, in display order.
    pub fn kpi_cards(&self) -> [(&'static str, String); 6] {
        let kpi = &self.indicators;
        [
            ("Active headcount", kpi.active_headcount.to_string()),
            ("Terminated", kpi.terminated_count.to_string()),
            ("Payroll", format_brl(kpi.payroll_total)),
            ("Total cost", format_brl(kpi.total_cost)),
            ("Average age", format_years(kpi.average_age)),
            ("Average rating", format_rating(kpi.average_rating)),
        ]
    }
}

pub struct DashboardView;

impl DashboardView {
    pub fn show(ui: &mut egui::Ui, session: &DashboardSession) {
        ScrollArea::vertical()
            .id_salt("dashboard_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(session.caption()).size(12.0).color(Color32::GRAY));

                let report = &session.prepared.report;
                if !report.is_clean() {
                    ui.label(
                        RichText::new(format!(
                            "{} values could not be read and were replaced by defaults",
                            report.len()
                        ))
                        .size(11.0)
                        .color(Color32::from_rgb(255, 193, 7)),
                    );
                }

                ui.add_space(10.0);
                Self::draw_kpi_cards(ui, session);
                ui.add_space(15.0);
                ui.separator();
                Self::draw_charts(ui, &session.charts);
                ui.add_space(15.0);
                ui.separator();
                ui.label(RichText::new("Data").size(16.0).strong());
                Self::draw_table(ui, session);
            });
    }

    fn draw_kpi_cards(ui: &mut egui::Ui, session: &DashboardSession) {
        ui.horizontal_wrapped(|ui| {
            for (label, value) in session.kpi_cards() {
                egui::Frame::none()
                    .rounding(8.0)
                    .stroke(egui::Stroke::new(2.0, ChartPlotter::get_color(0)))
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(20.0).strong());
                        });
                    });
                ui.add_space(8.0);
            }
        });
    }

    fn draw_charts(ui: &mut egui::Ui, charts: &DashboardCharts) {
        let headcount: Vec<(String, f64)> = charts
            .headcount_by_department
            .iter()
            .map(|(dept, count)| (dept.clone(), *count as f64))
            .collect();

        ui.columns(2, |cols| {
            ChartPlotter::draw_bar_chart(
                &mut cols[0],
                "headcount_by_department",
                "Headcount by department",
                "Department",
                "Employees",
                &headcount,
            );
            ChartPlotter::draw_bar_chart(
                &mut cols[1],
                "salary_by_role",
                "Average base salary by role",
                "Role",
                "Base salary",
                &charts.salary_by_role,
            );
        });

        ui.add_space(10.0);

        ui.columns(2, |cols| {
            ChartPlotter::draw_histogram(
                &mut cols[0],
                "age_histogram",
                "Age distribution",
                "Age",
                &charts.age_histogram,
            );
            ChartPlotter::draw_pie_chart(
                &mut cols[1],
                "sex_distribution",
                "Distribution by sex",
                &charts.sex_distribution,
            );
        });
    }

    /// All columns; only the visible rows are laid out.
    fn draw_table(ui: &mut egui::Ui, session: &DashboardSession) {
        let df = &session.prepared.frame;
        let columns = df.get_columns();

        ScrollArea::horizontal().id_salt("table_h").show(ui, |ui| {
            ui.vertical(|ui| {
                egui::Grid::new("table_header")
                    .min_col_width(CELL_WIDTH)
                    .max_col_width(CELL_WIDTH)
                    .show(ui, |ui| {
                        for name in &session.columns {
                            ui.label(RichText::new(name).strong());
                        }
                        ui.end_row();
                    });

                ScrollArea::vertical()
                    .id_salt("table_v")
                    .max_height(TABLE_HEIGHT)
                    .show_rows(ui, ROW_HEIGHT, df.height(), |ui, row_range| {
                        egui::Grid::new("table_rows")
                            .striped(true)
                            .min_col_width(CELL_WIDTH)
                            .max_col_width(CELL_WIDTH)
                            .min_row_height(ROW_HEIGHT)
                            .show(ui, |ui| {
                                for row in row_range {
                                    for column in columns {
                                        let text = column
                                            .get(row)
                                            .ok()
                                            .and_then(|v| cell_text(&v))
                                            .unwrap_or_default();
                                        ui.label(text);
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
        });
    }
}
