//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::charts::model::{FacetChart, RugChart, StackedBarChart};
use crate::charts::tooltip::{self, HOVER_RADIUS};
use crate::data::{NeighbourhoodAxis, SizeClass, TreeRecord, MAX_HEIGHT_RANGE};
use crate::selection::{date_from_axis, Brush, Emphasis, Mark, MarkEncoding};
use crate::stats::GenusSummary;
use egui::{Color32, RichText};
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, Legend, Line, Plot, PlotPoints, PlotResponse, Points,
    Polygon,
};
use std::collections::BTreeMap;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Size-class colors of the planting-date rug
pub const SMALL_COLOR: Color32 = Color32::from_rgb(0xbc, 0x80, 0xbd);
pub const LARGE_COLOR: Color32 = Color32::from_rgb(0, 0, 255);

const FACET_WIDTH: f32 = 260.0;
const FACET_HEIGHT: f32 = 140.0;
const BRUSH_COLOR: Color32 = Color32::from_rgb(128, 128, 128);

/// Creates visualization charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn genus_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    pub fn size_color(size: SizeClass) -> Color32 {
        match size {
            SizeClass::Small => SMALL_COLOR,
            SizeClass::Large => LARGE_COLOR,
        }
    }

    /// Fill color of a dashboard mark, faded by its opacity.
    pub fn mark_color(encoding: &MarkEncoding) -> Color32 {
        let (r, g, b) = encoding.emphasis.rgb();
        Color32::from_rgb(r, g, b).gamma_multiply(encoding.opacity)
    }

    /// Marker radius for an area given in px².
    pub fn mark_radius(encoding: &MarkEncoding) -> f32 {
        (encoding.size / std::f32::consts::PI).sqrt()
    }

    fn year_label(value: f64) -> String {
        date_from_axis(value)
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_default()
    }

    fn names_formatter(
        names: Vec<String>,
    ) -> impl Fn(egui_plot::GridMark, &std::ops::RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let rounded = mark.value.round();
            if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            names.get(rounded as usize).cloned().unwrap_or_default()
        }
    }

    /// Id of the point under the pointer, if any.
    fn hovered(
        plot_ui: &egui_plot::PlotUi,
        points: impl IntoIterator<Item = (usize, [f64; 2])>,
    ) -> Option<usize> {
        let pointer = plot_ui.pointer_coordinate()?;
        let scale = plot_ui.transform().dpos_dvalue();
        tooltip::nearest(points, [pointer.x, pointer.y], scale, HOVER_RADIUS)
    }

    /// Draw marks as a few `Points` series, one per distinct encoding.
    fn draw_marks(plot_ui: &mut egui_plot::PlotUi, marks: &[Mark]) {
        let mut series: BTreeMap<(bool, u32, u32), (MarkEncoding, Vec<[f64; 2]>)> = BTreeMap::new();
        for mark in marks {
            let enc = mark.encoding;
            let key = (
                enc.emphasis == Emphasis::Emphasized,
                enc.opacity.to_bits(),
                enc.size.to_bits(),
            );
            series
                .entry(key)
                .or_insert_with(|| (enc, Vec::new()))
                .1
                .push([mark.x, mark.y]);
        }

        // Emphasized marks last so they sit on top
        for (encoding, points) in series.into_values() {
            if encoding.opacity <= 0.0 {
                continue;
            }
            plot_ui.points(
                Points::new(PlotPoints::new(points))
                    .radius(Self::mark_radius(&encoding))
                    .color(Self::mark_color(&encoding))
                    .filled(true),
            );
        }
    }

    /// Height/diameter scatter, one small plot per genus, two per row.
    pub fn draw_facet_chart(ui: &mut egui::Ui, chart: &FacetChart) {
        if chart.panels.is_empty() {
            ui.label(RichText::new("No genus has more than 100 trees").color(Color32::GRAY));
            return;
        }

        egui::Grid::new("facet_grid")
            .num_columns(FacetChart::COLUMNS)
            .spacing([12.0, 12.0])
            .show(ui, |ui| {
                for (i, panel) in chart.panels.iter().enumerate() {
                    ui.vertical(|ui| {
                        ui.label(RichText::new(&panel.genus).strong());
                        let response = Plot::new(format!("facet_{}", panel.genus))
                            .width(FACET_WIDTH)
                            .height(FACET_HEIGHT)
                            .allow_zoom(false)
                            .allow_drag(false)
                            .allow_scroll(false)
                            .include_x(0.0)
                            .include_x(MAX_HEIGHT_RANGE as f64)
                            .include_y(0.0)
                            .include_y(chart.max_diameter)
                            .x_axis_label("Height range")
                            .y_axis_label("Diameter (in)")
                            .show_x(false)
                            .show_y(false)
                            .show(ui, |plot_ui| {
                                plot_ui.points(
                                    Points::new(PlotPoints::new(panel.points.clone()))
                                        .radius(3.0)
                                        .color(Self::genus_color(i))
                                        .name(&panel.genus),
                                );
                                Self::hovered(plot_ui, panel.points.iter().copied().enumerate())
                            });
                        if let Some(text) = response.inner.and_then(|p| panel.tooltips.get(p)) {
                            response.response.on_hover_text_at_pointer(text);
                        }
                    });
                    if (i + 1) % FacetChart::COLUMNS == 0 {
                        ui.end_row();
                    }
                }
            });
    }

    /// Horizontal tree-count bars per neighbourhood, stacked by genus.
    pub fn draw_stacked_bars(ui: &mut egui::Ui, id: &str, chart: &StackedBarChart) {
        if chart.segments.is_empty() {
            ui.label(RichText::new("No trees in these genera").color(Color32::GRAY));
            return;
        }

        let height = (chart.neighbourhoods.len() as f32 * 22.0).max(240.0);
        Plot::new(id)
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(chart.max_total)
            .x_axis_label("Count")
            .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
            .y_axis_formatter(Self::names_formatter(chart.neighbourhoods.clone()))
            .show(ui, |plot_ui| {
                for (g, genus) in chart.genera.iter().enumerate() {
                    let color = Self::genus_color(g);
                    let bars: Vec<Bar> = chart
                        .segments
                        .iter()
                        .filter(|s| s.genus == g)
                        .map(|s| {
                            Bar::new(s.neighbourhood as f64, s.count)
                                .base_offset(s.start)
                                .width(0.8)
                                .fill(color)
                        })
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).horizontal().color(color).name(genus));
                }
            });
    }

    /// Planting-date ticks by neighbourhood, colored by size class.
    pub fn draw_rug_chart(ui: &mut egui::Ui, chart: &RugChart) {
        if chart.ticks.is_empty() {
            ui.label(RichText::new("No planting dates recorded").color(Color32::GRAY));
            return;
        }

        let response = Plot::new("planting_rug")
            .height(420.0)
            .legend(Legend::default())
            .allow_scroll(false)
            .show_x(false)
            .show_y(false)
            .x_axis_label("Date planted")
            .x_axis_formatter(|mark, _range| Self::year_label(mark.value))
            .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
            .y_axis_formatter(Self::names_formatter(chart.neighbourhoods.clone()))
            .show(ui, |plot_ui| {
                for tick in &chart.ticks {
                    plot_ui.line(
                        Line::new(PlotPoints::new(vec![
                            [tick.x, tick.y - 0.35],
                            [tick.x, tick.y + 0.35],
                        ]))
                        .color(Self::size_color(tick.size))
                        .width(2.0)
                        .name(tick.size.label()),
                    );
                }
                Self::hovered(plot_ui, chart.ticks.iter().map(|t| [t.x, t.y]).enumerate())
            });
        if let Some(tick) = response.inner.and_then(|t| chart.ticks.get(t)) {
            response.response.on_hover_text_at_pointer(&tick.tooltip);
        }
    }

    /// Dashboard date-planted view with the brush rectangle.
    ///
    /// Dragging is left to the caller (brushing), so plot navigation is off.
    pub fn draw_date_view(
        ui: &mut egui::Ui,
        marks: &[Mark],
        axis: &NeighbourhoodAxis,
        brush: Option<&Brush>,
        width: f32,
    ) -> PlotResponse<()> {
        Plot::new("dashboard_date_view")
            .width(width)
            .height(420.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .allow_double_click_reset(false)
            .include_y(-0.5)
            .include_y(axis.len() as f64 - 0.5)
            .x_axis_label("Date planted")
            .x_axis_formatter(|mark, _range| Self::year_label(mark.value))
            .y_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
            .y_axis_formatter(Self::names_formatter(axis.names().to_vec()))
            .show(ui, |plot_ui| {
                Self::draw_marks(plot_ui, marks);

                if let Some(brush) = brush {
                    let (x0, x1) = (brush.dates.lo(), brush.dates.hi());
                    let (y0, y1) = (brush.neighbourhoods.lo(), brush.neighbourhoods.hi());
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1]]))
                            .fill_color(BRUSH_COLOR.gamma_multiply(0.2))
                            .stroke(egui::Stroke::new(1.0, BRUSH_COLOR)),
                    );
                }
            })
    }

    /// Dashboard size view; zoom and pan stay enabled.
    ///
    /// Hovering a visible mark shows its record from `records`.
    pub fn draw_size_view(ui: &mut egui::Ui, marks: &[Mark], records: &[TreeRecord], width: f32) {
        let response = Plot::new("dashboard_size_view")
            .width(width)
            .height(420.0)
            .include_x(0.0)
            .include_x(MAX_HEIGHT_RANGE as f64)
            .include_y(0.0)
            .x_axis_label("Height range (10 ft bands)")
            .y_axis_label("Diameter (in)")
            .show_x(false)
            .show_y(false)
            .show(ui, |plot_ui| {
                Self::draw_marks(plot_ui, marks);
                let visible = marks
                    .iter()
                    .filter(|m| m.encoding.opacity > 0.0)
                    .map(|m| (m.record, [m.x, m.y]));
                Self::hovered(plot_ui, visible)
            });
        if let Some(record) = response.inner.and_then(|r| records.get(r)) {
            response.response.on_hover_text_at_pointer(tooltip::size_view(record));
        }
    }

    /// Draw a describe() table for per-genus summaries.
    pub fn draw_summary_table(ui: &mut egui::Ui, id: &str, summaries: &[GenusSummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("summary_table_{}", id)))
                    .striped(true)
                    .min_col_width(55.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        for header in ["Genus", "N", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"] {
                            ui.label(RichText::new(header).strong().size(11.0));
                        }
                        ui.end_row();

                        let fmt = |v: f64| {
                            if v.is_nan() {
                                "-".to_string()
                            } else {
                                format!("{:.2}", v)
                            }
                        };

                        for gs in summaries {
                            ui.label(RichText::new(&gs.genus).size(11.0));
                            ui.label(RichText::new(gs.count.to_string()).size(11.0));
                            for v in [gs.mean, gs.std, gs.min, gs.p25, gs.median, gs.p75, gs.max] {
                                ui.label(RichText::new(fmt(v)).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}
