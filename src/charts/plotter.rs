//! Chart Plotter Module
//! Draws the dashboard charts with egui_plot.

use crate::charts::HistogramBin;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, Polygon, Text};
use std::f64::consts::TAU;

/// Pink dashboard palette
pub const PALETTE: [Color32; 5] = [
    Color32::from_rgb(255, 20, 147),  // Deep Pink
    Color32::from_rgb(255, 105, 180), // Hot Pink
    Color32::from_rgb(255, 133, 193),
    Color32::from_rgb(255, 77, 166),
    Color32::from_rgb(255, 153, 204),
];

const CHART_HEIGHT: f32 = 280.0;

/// Segments per full turn when approximating pie slices.
const PIE_SEGMENTS: f64 = 96.0;

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn get_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Vertical bars, one per category, labelled on the x axis.
    pub fn draw_bar_chart(
        ui: &mut egui::Ui,
        id: &str,
        title: &str,
        x_label: &str,
        y_label: &str,
        series: &[(String, f64)],
    ) {
        ui.label(RichText::new(title).size(14.0).strong());
        if series.is_empty() {
            return;
        }

        let labels: Vec<String> = series.iter().map(|(label, _)| label.clone()).collect();
        let bars: Vec<Bar> = series
            .iter()
            .enumerate()
            .map(|(i, (label, value))| {
                Bar::new(i as f64, *value)
                    .name(label)
                    .width(0.6)
                    .fill(Self::get_color(0))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label(y_label)
            .x_axis_formatter(move |mark, _range| {
                let v = mark.value;
                if (v - v.round()).abs() > 1e-6 || v < 0.0 {
                    return String::new();
                }
                labels.get(v.round() as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Self::get_color(0)).name(y_label));
            });
    }

    /// Histogram of adjacent bars.
    pub fn draw_histogram(ui: &mut egui::Ui, id: &str, title: &str, x_label: &str, bins: &[HistogramBin]) {
        ui.label(RichText::new(title).size(14.0).strong());
        if bins.is_empty() {
            return;
        }

        let bars: Vec<Bar> = bins
            .iter()
            .map(|bin| {
                Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                    .width(bin.end - bin.start)
                    .name(format!("{:.0}–{:.0}", bin.start, bin.end))
                    .fill(Self::get_color(1))
            })
            .collect();

        Plot::new(id)
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("count")
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Self::get_color(1)));
            });
    }

    /// Pie chart built from filled polygons, one per slice.
    pub fn draw_pie_chart(ui: &mut egui::Ui, id: &str, title: &str, slices: &[(String, usize)]) {
        ui.label(RichText::new(title).size(14.0).strong());
        let total: usize = slices.iter().map(|(_, count)| count).sum();
        if total == 0 {
            return;
        }

        Plot::new(id)
            .height(CHART_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let mut start = 0.0;
                for (i, (label, count)) in slices.iter().enumerate() {
                    let share = *count as f64 / total as f64;
                    let sweep = share * TAU;
                    let color = Self::get_color(i);

                    plot_ui.polygon(
                        Polygon::new(Self::slice_points(start, sweep))
                            .fill_color(color)
                            .stroke(egui::Stroke::new(1.0, Color32::WHITE))
                            .name(label),
                    );

                    let mid = start + sweep / 2.0;
                    plot_ui.text(
                        Text::new(
                            PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                            RichText::new(format!("{:.1}%", share * 100.0))
                                .color(Color32::WHITE)
                                .strong(),
                        ),
                    );

                    start += sweep;
                }
            });
    }

    /// Outline of a unit-circle slice starting at `start` radians.
    fn slice_points(start: f64, sweep: f64) -> PlotPoints {
        let steps = ((sweep / TAU) * PIE_SEGMENTS).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push([0.0, 0.0]);
        for step in 0..=steps {
            let angle = start + sweep * step as f64 / steps as f64;
            points.push([angle.cos(), angle.sin()]);
        }
        PlotPoints::from(points)
    }
}
