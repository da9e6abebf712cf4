//! Dashboard Widget
//! Linked date-planted and size views driven by the selection coordinator.

use crate::charts::ChartPlotter;
use crate::data::{TreeDataset, MAX_HEIGHT_RANGE};
use crate::selection::{self, date_from_axis, Brush, DashboardFrame, SelectionCoordinator, SelectionError};
use egui::{Color32, RichText};
use log::warn;
use std::sync::Arc;

pub struct DashboardView {
    dataset: Arc<TreeDataset>,
    coordinator: SelectionCoordinator,
    frame: DashboardFrame,
    rendered_generation: Option<u64>,
    drag_origin: Option<[f64; 2]>,
}

impl DashboardView {
    pub fn new(dataset: Arc<TreeDataset>) -> Self {
        let coordinator = SelectionCoordinator::new(dataset.genus_options());
        Self {
            dataset,
            coordinator,
            frame: DashboardFrame::default(),
            rendered_generation: None,
            drag_origin: None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.dataset.is_empty() || self.dataset.neighbourhoods().is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("The loaded file has no trees").size(20.0));
            });
            return;
        }

        self.show_controls(ui);
        ui.add_space(8.0);

        // Re-encode only when a selection actually changed
        if self.rendered_generation != Some(self.coordinator.generation()) {
            self.frame = selection::render(
                self.dataset.records(),
                self.dataset.neighbourhoods(),
                self.coordinator.state(),
            );
            self.rendered_generation = Some(self.coordinator.generation());
        }

        let dataset = Arc::clone(&self.dataset);
        let width = ((ui.available_width() - ui.spacing().item_spacing.x) / 2.0).max(200.0);

        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new("Date planted by neighbourhood").strong());
                let response = ChartPlotter::draw_date_view(
                    ui,
                    &self.frame.date_view,
                    dataset.neighbourhoods(),
                    self.coordinator.state().brush(),
                    width,
                );

                let pointer = response
                    .response
                    .interact_pointer_pos()
                    .map(|pos| response.transform.value_from_position(pos))
                    .map(|p| [p.x, p.y]);

                if response.response.drag_started() {
                    self.drag_origin = pointer;
                }
                if response.response.dragged() {
                    if let (Some(origin), Some(current)) = (self.drag_origin, pointer) {
                        let brush = Brush::from_corners(origin, current);
                        self.apply(|c| c.set_brush(Some(brush)));
                    }
                }
                if response.response.drag_stopped() {
                    self.drag_origin = None;
                }
                if response.response.clicked() {
                    self.apply(|c| c.set_brush(None));
                }
            });

            ui.vertical(|ui| {
                ui.label(RichText::new("Diameter by height range").strong());
                ChartPlotter::draw_size_view(ui, &self.frame.size_view, dataset.records(), width);
            });
        });

        ui.add_space(6.0);
        ui.label(
            RichText::new(format!(
                "{} trees, {} with a planting date, {} in the size view",
                dataset.len(),
                dataset.dated_count(),
                self.frame.size_view.len()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let state = self.coordinator.state();
        let mut genus = state.selected_genus().map(str::to_string);
        let mut threshold = state.height_threshold();
        let brush_text = state.brush().map(|b| {
            let from = date_from_axis(b.dates.lo()).map(|d| d.to_string()).unwrap_or_default();
            let to = date_from_axis(b.dates.hi()).map(|d| d.to_string()).unwrap_or_default();
            format!("Brush: {from} to {to}")
        });

        let mut genus_changed = false;
        let mut clear_brush = false;

        ui.horizontal(|ui| {
            ui.label("Genus:");
            egui::ComboBox::from_id_salt("genus_select")
                .width(180.0)
                .selected_text(genus.as_deref().unwrap_or("None"))
                .show_ui(ui, |ui| {
                    genus_changed |= ui.selectable_value(&mut genus, None, "None").changed();
                    for name in self.coordinator.genera() {
                        genus_changed |= ui
                            .selectable_value(&mut genus, Some(name.clone()), name)
                            .changed();
                    }
                });

            ui.add_space(20.0);
            ui.add(
                egui::Slider::new(&mut threshold, 0..=MAX_HEIGHT_RANGE).text("Height range up to"),
            );

            ui.add_space(20.0);
            if let Some(text) = &brush_text {
                ui.label(RichText::new(text).size(11.0));
                clear_brush = ui.small_button("✖ Clear").clicked();
            } else {
                ui.label(
                    RichText::new("Drag on the date view to filter by neighbourhood and date")
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            }
        });

        if genus_changed {
            self.apply(|c| c.set_genus(genus.as_deref()));
        }
        if threshold != self.coordinator.state().height_threshold() {
            self.apply(|c| c.set_height_threshold(threshold));
        }
        if clear_brush {
            self.apply(|c| c.set_brush(None));
        }
    }

    fn apply(&mut self, event: impl FnOnce(&mut SelectionCoordinator) -> Result<(), SelectionError>) {
        if let Err(e) = event(&mut self.coordinator) {
            warn!("Selection rejected: {}", e);
        }
    }
}
