//! Chart Export Module
//! Writes the four static charts as PNG files plus a JSON dump of the
//! summary tables into one output directory.

use crate::analysis::{Analysis, TOP_N};
use crate::charts::{ChartKind, StaticChartRenderer};
use crate::data::GenusCount;
use crate::stats::{GenusSummary, PlantingYears, StatsCalculator};
use anyhow::Context;
use log::info;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summaries.json";

/// Contents of `summaries.json`.
#[derive(Serialize)]
struct SummaryExport<'a> {
    genus_counts: &'a [GenusCount],
    ubiquitous_genera: &'a [String],
    largest_by_diameter: Vec<GenusSummary>,
    largest_by_height: Vec<GenusSummary>,
    smallest_by_diameter: Vec<GenusSummary>,
    smallest_by_height: Vec<GenusSummary>,
    large_genera: &'a [String],
    small_genera: &'a [String],
    planting_years: &'a PlantingYears,
}

impl<'a> SummaryExport<'a> {
    fn from_analysis(analysis: &'a Analysis) -> Self {
        Self {
            genus_counts: &analysis.genus_counts,
            ubiquitous_genera: &analysis.ubiquitous_genera,
            largest_by_diameter: StatsCalculator::largest_by_mean(&analysis.diameter_summary, TOP_N),
            largest_by_height: StatsCalculator::largest_by_mean(&analysis.height_summary, TOP_N),
            smallest_by_diameter: StatsCalculator::smallest_by_mean(&analysis.diameter_summary, TOP_N),
            smallest_by_height: StatsCalculator::smallest_by_mean(&analysis.height_summary, TOP_N),
            large_genera: &analysis.large_genera,
            small_genera: &analysis.small_genera,
            planting_years: &analysis.planting_years,
        }
    }
}

/// Write the summary tables as pretty JSON.
pub fn write_summaries(analysis: &Analysis, output_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let path = output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(&SummaryExport::from_analysis(analysis))?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// Render every static chart to PNG and write the summaries.
///
/// Returns the paths written, charts first.
pub fn export_all(
    analysis: &Analysis,
    output_dir: &Path,
    width: u32,
    height: u32,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut written = Vec::with_capacity(ChartKind::ALL.len() + 1);
    for kind in ChartKind::ALL {
        let png = StaticChartRenderer::render_chart_to_bytes(analysis, kind, width, height)
            .with_context(|| format!("rendering '{}'", kind.title()))?;
        let path = output_dir.join(kind.file_name());
        fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    written.push(write_summaries(analysis, output_dir)?);

    info!("Exported {} files to {}", written.len(), output_dir.display());
    Ok(written)
}
