//! Static Chart Renderer
//! Draws the four static charts into PNG images with plotters.
//!
//! Layout per chart: caption across the top, then the plot area. The faceted
//! scatter splits the area into a two-column grid of panels.

use crate::analysis::Analysis;
use crate::charts::model::{ChartKind, FacetChart, RugChart, StackedBarChart};
use crate::charts::plotter::PALETTE;
use crate::data::{SizeClass, MAX_HEIGHT_RANGE};
use crate::selection::date_from_axis;
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const FONT: &str = "sans-serif";
const SMALL_RGB: RGBColor = RGBColor(0xbc, 0x80, 0xbd);
const LARGE_RGB: RGBColor = RGBColor(0, 0, 255);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image buffer does not match {0}x{1}")]
    Buffer(u32, u32),
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn palette_rgb(index: usize) -> RGBColor {
    let c = PALETTE[index % PALETTE.len()];
    RGBColor(c.r(), c.g(), c.b())
}

fn size_rgb(size: SizeClass) -> RGBColor {
    match size {
        SizeClass::Small => SMALL_RGB,
        SizeClass::Large => LARGE_RGB,
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render one chart and encode it as PNG bytes.
    pub fn render_chart_to_bytes(
        analysis: &Analysis,
        kind: ChartKind,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;
            let area = root
                .titled(kind.title(), (FONT, 22).into_font())
                .map_err(draw_err)?;

            match kind {
                ChartKind::Ubiquitous => Self::draw_facets(&area, &analysis.ubiquitous)?,
                ChartKind::LargeTrees => Self::draw_bars(&area, &analysis.large_trees)?,
                ChartKind::SmallTrees => Self::draw_bars(&area, &analysis.small_trees)?,
                ChartKind::PlantingDates => Self::draw_rug(&area, &analysis.planting)?,
            }
            root.present().map_err(draw_err)?;
        }

        let image =
            RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    fn draw_facets<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        chart: &FacetChart,
    ) -> Result<(), RenderError> {
        if chart.panels.is_empty() {
            return Self::draw_empty(area, "No genus has more than 100 trees");
        }

        let panels = area.split_evenly((chart.rows(), FacetChart::COLUMNS));
        let y_max = (chart.max_diameter * 1.1).max(1.0);

        for (i, (panel_area, panel)) in panels.iter().zip(&chart.panels).enumerate() {
            let color = palette_rgb(i);
            let mut ctx = ChartBuilder::on(panel_area)
                .caption(&panel.genus, (FONT, 14))
                .margin(6)
                .x_label_area_size(28)
                .y_label_area_size(40)
                .build_cartesian_2d(-0.5f64..(MAX_HEIGHT_RANGE as f64 + 0.5), 0f64..y_max)
                .map_err(draw_err)?;

            ctx.configure_mesh()
                .x_desc("Height range")
                .y_desc("Diameter (in)")
                .x_labels(MAX_HEIGHT_RANGE as usize + 1)
                .y_labels(4)
                .draw()
                .map_err(draw_err)?;

            ctx.draw_series(
                panel
                    .points
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), 3, color.mix(0.7).filled())),
            )
            .map_err(draw_err)?;
        }
        Ok(())
    }

    fn draw_bars<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        chart: &StackedBarChart,
    ) -> Result<(), RenderError> {
        if chart.segments.is_empty() {
            return Self::draw_empty(area, "No trees in these genera");
        }

        let n = chart.neighbourhoods.len();
        let names = &chart.neighbourhoods;
        let label = |y: &f64| {
            let rounded = y.round();
            if (y - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            names.get(rounded as usize).cloned().unwrap_or_default()
        };

        let mut ctx = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(170)
            .build_cartesian_2d(0f64..(chart.max_total * 1.05).max(1.0), -0.5f64..(n as f64 - 0.5))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&label)
            .x_desc("Count")
            .draw()
            .map_err(draw_err)?;

        for (g, genus) in chart.genera.iter().enumerate() {
            let color = palette_rgb(g);
            ctx.draw_series(chart.segments.iter().filter(|s| s.genus == g).map(|s| {
                let y = s.neighbourhood as f64;
                Rectangle::new(
                    [(s.start, y - 0.4), (s.start + s.count, y + 0.4)],
                    color.filled(),
                )
            }))
            .map_err(draw_err)?
            .label(genus.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_rug<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        chart: &RugChart,
    ) -> Result<(), RenderError> {
        let Some((x_lo, x_hi)) = chart.x_range else {
            return Self::draw_empty(area, "No planting dates recorded");
        };
        // A year of padding either side
        let (x_lo, x_hi) = (x_lo - 365.0, x_hi + 365.0);

        let n = chart.neighbourhoods.len();
        let names = &chart.neighbourhoods;
        let y_label = |y: &f64| {
            let rounded = y.round();
            if (y - rounded).abs() > 1e-6 || rounded < 0.0 {
                return String::new();
            }
            names.get(rounded as usize).cloned().unwrap_or_default()
        };
        let x_label = |x: &f64| {
            date_from_axis(*x)
                .map(|d| d.format("%Y").to_string())
                .unwrap_or_default()
        };

        let mut ctx = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(170)
            .build_cartesian_2d(x_lo..x_hi, -0.5f64..(n as f64 - 0.5))
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&y_label)
            .x_label_formatter(&x_label)
            .x_desc("Date planted")
            .draw()
            .map_err(draw_err)?;

        for size in [SizeClass::Small, SizeClass::Large] {
            let color = size_rgb(size);
            ctx.draw_series(chart.ticks.iter().filter(|t| t.size == size).map(|t| {
                PathElement::new(
                    vec![(t.x, t.y - 0.35), (t.x, t.y + 0.35)],
                    color.stroke_width(3),
                )
            }))
            .map_err(draw_err)?
            .label(size.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
        Ok(())
    }

    fn draw_empty<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        message: &str,
    ) -> Result<(), RenderError> {
        let (w, h) = area.dim_in_pixel();
        area.draw(&Text::new(
            message.to_string(),
            (w as i32 / 2 - 120, h as i32 / 2),
            (FONT, 18).into_font().color(&BLACK),
        ))
        .map_err(draw_err)
    }
}
