//! Analysis Module
//! Everything the static charts and summary tables need, computed once per
//! loaded dataset.

use crate::charts::{FacetChart, RugChart, StackedBarChart};
use crate::data::{DataProcessor, GenusCount, TreeDataset, TreeRecord, UBIQUITOUS_MIN_COUNT};
use crate::stats::{GenusSummary, Measure, PlantingYears, StatsCalculator};
use log::info;
use std::collections::HashSet;

/// Size of the largest/smallest genus rankings.
pub const TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct Analysis {
    pub genus_counts: Vec<GenusCount>,
    pub ubiquitous_genera: Vec<String>,
    pub diameter_summary: Vec<GenusSummary>,
    pub height_summary: Vec<GenusSummary>,
    /// In both the top-10 by mean diameter and by mean height, sorted
    pub large_genera: Vec<String>,
    /// In both the bottom-10 by mean diameter and by mean height, sorted.
    ///
    /// Both measures count, as for `large_genera`: a genus with thin but
    /// tall trees is not small.
    pub small_genera: Vec<String>,
    pub planting_years: PlantingYears,
    pub ubiquitous: FacetChart,
    pub large_trees: StackedBarChart,
    pub small_trees: StackedBarChart,
    pub planting: RugChart,
}

impl Analysis {
    pub fn compute(dataset: &TreeDataset) -> Self {
        let records = dataset.records();
        let genus_counts = dataset.genus_counts().to_vec();
        let ubiquitous_genera = DataProcessor::ubiquitous_genera(&genus_counts, UBIQUITOUS_MIN_COUNT);

        let diameter_summary = StatsCalculator::describe_by_genus(records, Measure::Diameter);
        let height_summary = StatsCalculator::describe_by_genus(records, Measure::HeightRange);

        let large_genera = Self::intersect(
            &StatsCalculator::largest_by_mean(&diameter_summary, TOP_N),
            &StatsCalculator::largest_by_mean(&height_summary, TOP_N),
        );
        let small_genera = Self::intersect(
            &StatsCalculator::smallest_by_mean(&diameter_summary, TOP_N),
            &StatsCalculator::smallest_by_mean(&height_summary, TOP_N),
        );
        info!(
            "{} common genera, large: {:?}, small: {:?}",
            ubiquitous_genera.len(),
            large_genera,
            small_genera
        );

        let large = Self::select(records, &large_genera);
        let small = Self::select(records, &small_genera);
        let labelled = DataProcessor::label_sizes(&small, &large);

        Self {
            ubiquitous: FacetChart::build(records, &ubiquitous_genera),
            large_trees: StackedBarChart::build(&large),
            small_trees: StackedBarChart::build(&small),
            planting: RugChart::build(&labelled),
            planting_years: StatsCalculator::planting_years(&large, &small),
            genus_counts,
            ubiquitous_genera,
            diameter_summary,
            height_summary,
            large_genera,
            small_genera,
        }
    }

    fn intersect(a: &[GenusSummary], b: &[GenusSummary]) -> Vec<String> {
        let b: HashSet<&str> = b.iter().map(|s| s.genus.as_str()).collect();
        let mut genera: Vec<String> = a
            .iter()
            .filter(|s| b.contains(s.genus.as_str()))
            .map(|s| s.genus.clone())
            .collect();
        genera.sort();
        genera
    }

    fn select<'a>(records: &'a [TreeRecord], genera: &[String]) -> Vec<&'a TreeRecord> {
        let set: HashSet<String> = genera.iter().cloned().collect();
        DataProcessor::filter_genera(records, &set)
    }
}
