//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod dashboard;

pub use app::CanopyApp;
pub use chart_viewer::{ChartViewer, ViewTab};
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use dashboard::DashboardView;
