//! Chart Viewer Widget
//! Central scrollable area showing one static chart or the summary tables.

use crate::analysis::{Analysis, TOP_N};
use crate::charts::{ChartKind, ChartPlotter};
use crate::stats::{GenusSummary, Measure, StatsCalculator, YearSummary};
use egui::{Color32, RichText, ScrollArea};
use std::sync::Arc;

/// Tabs of the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Dashboard,
    Chart(ChartKind),
    Summaries,
}

impl ViewTab {
    pub fn all() -> Vec<ViewTab> {
        let mut tabs = vec![ViewTab::Dashboard];
        tabs.extend(ChartKind::ALL.iter().map(|k| ViewTab::Chart(*k)));
        tabs.push(ViewTab::Summaries);
        tabs
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewTab::Dashboard => "Dashboard",
            ViewTab::Chart(kind) => kind.tab_label(),
            ViewTab::Summaries => "Summaries",
        }
    }
}

/// Scrollable static chart display.
#[derive(Default)]
pub struct ChartViewer {
    pub analysis: Option<Arc<Analysis>>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.analysis = None;
    }

    pub fn set_analysis(&mut self, analysis: Arc<Analysis>) {
        self.analysis = Some(analysis);
    }

    pub fn show_chart(&self, ui: &mut egui::Ui, kind: ChartKind) {
        let Some(analysis) = &self.analysis else {
            Self::show_no_data(ui);
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_card(ui, kind.title(), |ui| match kind {
                    ChartKind::Ubiquitous => {
                        ChartPlotter::draw_facet_chart(ui, &analysis.ubiquitous);
                    }
                    ChartKind::LargeTrees => {
                        ChartPlotter::draw_stacked_bars(ui, "large_trees", &analysis.large_trees);
                    }
                    ChartKind::SmallTrees => {
                        ChartPlotter::draw_stacked_bars(ui, "small_trees", &analysis.small_trees);
                    }
                    ChartKind::PlantingDates => {
                        ChartPlotter::draw_rug_chart(ui, &analysis.planting);
                        ui.add_space(8.0);
                        Self::draw_planting_note(ui, analysis);
                    }
                });
            });
    }

    pub fn show_summaries(&self, ui: &mut egui::Ui) {
        let Some(analysis) = &self.analysis else {
            Self::show_no_data(ui);
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                Self::draw_card(ui, "Trees per genus", |ui| {
                    egui::Grid::new("genus_counts")
                        .striped(true)
                        .num_columns(2)
                        .show(ui, |ui| {
                            for gc in &analysis.genus_counts {
                                ui.label(&gc.genus);
                                ui.label(gc.count.to_string());
                                ui.end_row();
                            }
                        });
                });

                let tables: Vec<(String, String, Vec<GenusSummary>)> =
                    [Measure::Diameter, Measure::HeightRange]
                        .into_iter()
                        .flat_map(|measure| {
                            let summary = match measure {
                                Measure::Diameter => &analysis.diameter_summary,
                                Measure::HeightRange => &analysis.height_summary,
                            };
                            let label = measure.label().to_lowercase();
                            [
                                (
                                    format!("Largest genera by mean {}", label),
                                    format!("top_{:?}", measure),
                                    StatsCalculator::largest_by_mean(summary, TOP_N),
                                ),
                                (
                                    format!("Smallest genera by mean {}", label),
                                    format!("low_{:?}", measure),
                                    StatsCalculator::smallest_by_mean(summary, TOP_N),
                                ),
                            ]
                        })
                        .collect();
                for (title, id, summaries) in &tables {
                    ui.add_space(12.0);
                    Self::draw_card(ui, title, |ui| {
                        ChartPlotter::draw_summary_table(ui, id, summaries);
                    });
                }
            });
    }

    fn show_no_data(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No Data").size(20.0));
        });
    }

    fn draw_planting_note(ui: &mut egui::Ui, analysis: &Analysis) {
        let years = &analysis.planting_years;
        ui.label(format!("Large: {}", Self::year_text(&years.large)));
        ui.label(format!("Small: {}", Self::year_text(&years.small)));
        ui.label(
            RichText::new(format!(
                "{} trees without a planting date are not shown",
                analysis.planting.undated
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }

    fn year_text(summary: &YearSummary) -> String {
        match (summary.earliest, summary.latest) {
            (Some(first), Some(last)) => format!(
                "{} trees planted {}-{}, mean year {:.1}",
                summary.count, first, last, summary.mean_year
            ),
            _ => "no dated trees".to_string(),
        }
    }

    /// Draw a titled card frame around `content`
    fn draw_card(ui: &mut egui::Ui, title: &str, content: impl FnOnce(&mut egui::Ui)) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, Color32::from_rgb(40, 167, 69)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(18.0).strong());
                ui.add_space(8.0);
                content(ui);
            });
    }
}
