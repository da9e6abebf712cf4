//! Canopy Main Application
//! Main window with control panel, dashboard and static chart tabs.

use crate::analysis::Analysis;
use crate::config::Settings;
use crate::data::{DataSource, TreeDataset, TreeLoader};
use crate::export;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardView, ViewTab};
use egui::SidePanel;
use log::{error, info, warn};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

/// Loading result from background thread
enum LoadResult {
    Progress(f32, String),
    Complete {
        dataset: Arc<TreeDataset>,
        analysis: Arc<Analysis>,
    },
    Error(String),
}

/// Tracks the running load and at most one load requested meanwhile.
#[derive(Debug, Default)]
struct LoadQueue {
    running: bool,
    pending: bool,
}

impl LoadQueue {
    /// True when a load should start now; otherwise the request is queued.
    fn request(&mut self) -> bool {
        if self.running {
            self.pending = true;
            false
        } else {
            self.running = true;
            true
        }
    }

    /// Ends the running load. True when a queued load should start.
    fn finish(&mut self) -> bool {
        self.running = false;
        std::mem::take(&mut self.pending)
    }

    fn is_running(&self) -> bool {
        self.running
    }
}

/// Main application window.
pub struct CanopyApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    dashboard: Option<DashboardView>,
    analysis: Option<Arc<Analysis>>,
    tab: ViewTab,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    loads: LoadQueue,
}

impl CanopyApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Settings::load(cc.storage);
        let mut app = Self {
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            dashboard: None,
            analysis: None,
            tab: ViewTab::Dashboard,
            load_rx: None,
            loads: LoadQueue::default(),
        };
        app.start_loading();
        app
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.data_source = path.to_string_lossy().to_string();
            self.start_loading();
        }
    }

    fn handle_choose_output_dir(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_directory(&self.control_panel.settings.output_dir)
            .pick_folder()
        {
            self.control_panel.settings.output_dir = dir;
        }
    }

    /// Start loading the configured source in a background thread.
    ///
    /// While a load runs, the request is queued and starts once it ends.
    fn start_loading(&mut self) {
        if !self.loads.request() {
            info!("Load in progress, queueing {}", self.control_panel.settings.source());
            self.control_panel.status = "Reload queued until the current load ends".to_string();
            return;
        }

        let source = self.control_panel.settings.source();
        info!("Loading street trees from {}", source);

        // Clear previous results
        self.chart_viewer.clear();
        self.dashboard = None;
        self.analysis = None;
        self.control_panel.export_enabled = false;
        self.control_panel.load_enabled = false;
        self.control_panel.set_progress(5.0, "Loading data...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            Self::run_loading(tx, source);
        });
    }

    /// Load and analyse (called from background thread)
    fn run_loading(tx: Sender<LoadResult>, source: DataSource) {
        let step = match &source {
            DataSource::Url(_) => "Downloading CSV...",
            DataSource::File(_) => "Reading CSV file...",
        };
        let _ = tx.send(LoadResult::Progress(10.0, step.to_string()));

        let records = match TreeLoader::load(&source) {
            Ok(records) => records,
            Err(e) => {
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }
        };

        let _ = tx.send(LoadResult::Progress(
            60.0,
            format!("Analysing {} trees...", records.len()),
        ));

        let dataset = TreeDataset::new(records);
        let analysis = Analysis::compute(&dataset);

        let _ = tx.send(LoadResult::Complete {
            dataset: Arc::new(dataset),
            analysis: Arc::new(analysis),
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        let mut queued = false;
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(progress, status) => {
                        self.control_panel.set_progress(progress, &status);
                    }
                    LoadResult::Complete { dataset, analysis } => {
                        info!(
                            "Loaded {} trees across {} genera",
                            dataset.len(),
                            dataset.genus_counts().len()
                        );
                        self.control_panel.set_progress(
                            100.0,
                            &format!(
                                "Loaded {} trees, {} genera",
                                dataset.len(),
                                dataset.genus_counts().len()
                            ),
                        );
                        self.dashboard = Some(DashboardView::new(dataset));
                        self.chart_viewer.set_analysis(Arc::clone(&analysis));
                        self.analysis = Some(analysis);
                        self.control_panel.export_enabled = true;
                        queued |= self.finish_loading();
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(e) => {
                        error!("Loading failed: {}", e);
                        self.control_panel.set_progress(0.0, &format!("Error: {}", e));
                        queued |= self.finish_loading();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }

        if queued {
            self.start_loading();
        }
    }

    /// Returns whether a queued load is waiting.
    fn finish_loading(&mut self) -> bool {
        self.control_panel.load_enabled = true;
        self.loads.finish()
    }

    /// Render all static charts and summaries into the output directory
    fn handle_export(&mut self) {
        let Some(analysis) = &self.analysis else {
            self.control_panel.set_progress(0.0, "No charts to export");
            return;
        };

        let output_dir = self.control_panel.settings.output_dir.clone();
        let (width, height) = (
            self.control_panel.settings.export_width,
            self.control_panel.settings.export_height,
        );
        self.control_panel.set_progress(50.0, "Rendering charts...");

        match export::export_all(analysis, &output_dir, width, height) {
            Ok(paths) => {
                self.control_panel.set_progress(
                    100.0,
                    &format!("Exported {} files to {}", paths.len(), output_dir.display()),
                );
                if let Err(e) = open::that(&output_dir) {
                    warn!("Could not open {}: {}", output_dir.display(), e);
                }
            }
            Err(e) => {
                error!("Export failed: {:#}", e);
                self.control_panel.set_progress(0.0, &format!("Error: {:#}", e));
            }
        }
    }

    fn show_tabs(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for tab in ViewTab::all() {
                ui.selectable_value(&mut self.tab, tab, tab.label());
            }
        });
        ui.separator();
    }
}

impl eframe::App for CanopyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.loads.is_running() {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Load => self.start_loading(),
                        ControlPanelAction::ChooseOutputDir => self.handle_choose_output_dir(),
                        ControlPanelAction::ExportCharts => self.handle_export(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard or chart tabs
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_tabs(ui);

            match self.tab {
                ViewTab::Dashboard => match &mut self.dashboard {
                    Some(dashboard) => dashboard.show(ui),
                    None => {
                        ui.centered_and_justified(|ui| {
                            ui.label(egui::RichText::new("No Data").size(20.0));
                        });
                    }
                },
                ViewTab::Chart(kind) => self.chart_viewer.show_chart(ui, kind),
                ViewTab::Summaries => self.chart_viewer.show_summaries(ui),
            }
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.control_panel.settings.save(storage);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_requested_while_running_is_queued() {
        let mut loads = LoadQueue::default();
        assert!(loads.request());
        assert!(loads.is_running());

        assert!(!loads.request());
        assert!(!loads.request());

        // Both requests collapse into one queued load
        assert!(loads.finish());
        assert!(!loads.is_running());
        assert!(loads.request());
        assert!(!loads.finish());
    }

    #[test]
    fn test_idle_finish_starts_nothing() {
        let mut loads = LoadQueue::default();
        assert!(!loads.finish());
        assert!(loads.request());
    }
}
