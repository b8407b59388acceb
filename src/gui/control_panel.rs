//! Control Panel Widget
//! Left side panel with the data source inputs and download buttons.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// Left side control panel with file selection and export controls.
pub struct ControlPanel {
    /// Contents of the path text field.
    pub path_input: String,
    /// Name of the last uploaded file, if the current table came from one.
    pub uploaded_name: Option<String>,
    pub status: String,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(default_path: &std::path::Path) -> Self {
        Self {
            path_input: default_path.display().to_string(),
            uploaded_name: None,
            status: "Ready".to_string(),
            export_enabled: false,
        }
    }

    pub fn path(&self) -> PathBuf {
        PathBuf::from(self.path_input.trim())
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("👥 HR Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(255, 20, 147)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Upload Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let upload_text = self
                        .uploaded_name
                        .clone()
                        .unwrap_or_else(|| "No file uploaded".to_string());

                    ui.label(RichText::new(&upload_text).size(12.0).color(
                        if self.uploaded_name.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Upload").clicked() {
                            action = ControlPanelAction::Upload;
                        }
                    });
                });
            });

        ui.add_space(10.0);

        // ===== Path Section =====
        ui.label("Or path to Excel file:");
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.path_input).desired_width(200.0),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                action = ControlPanelAction::LoadPath;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Download Buttons =====
        ui.label(RichText::new("⬇ Downloads").size(14.0).strong());
        ui.add_space(5.0);

        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let csv_button = egui::Button::new(RichText::new("Download CSV").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(csv_button).clicked() {
                    action = ControlPanelAction::ExportCsv;
                }

                ui.add_space(8.0);

                let xlsx_button = egui::Button::new(RichText::new("Download Excel").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(xlsx_button).clicked() {
                    action = ControlPanelAction::ExportXlsx;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Loaded") || self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Upload,
    LoadPath,
    ExportCsv,
    ExportXlsx,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn path_field_starts_with_default_and_is_trimmed() {
        let mut panel = ControlPanel::new(Path::new("BaseFuncionarios.xlsx"));
        assert_eq!(panel.path_input, "BaseFuncionarios.xlsx");
        assert!(!panel.export_enabled);

        panel.path_input = "  dados/base.xlsx ".to_string();
        assert_eq!(panel.path(), PathBuf::from("dados/base.xlsx"));
    }
}
