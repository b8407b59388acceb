//! GUI module - User interface components

mod app;
mod control_panel;
mod dashboard_view;
pub mod format;

pub use app::HrDashboardApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use dashboard_view::{DashboardSession, DashboardView};
