//! Statistics Calculator Module
//! Per-genus descriptive statistics and planting-year summaries.

use crate::data::TreeRecord;
use chrono::Datelike;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

/// Numeric attribute summarised per genus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Measure {
    Diameter,
    HeightRange,
}

impl Measure {
    pub fn value(&self, record: &TreeRecord) -> f64 {
        match self {
            Measure::Diameter => record.diameter,
            Measure::HeightRange => record.height_range_id as f64,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Measure::Diameter => "Diameter (in)",
            Measure::HeightRange => "Height range",
        }
    }
}

/// Descriptive statistics for one genus (the columns of a pandas `describe()`).
#[derive(Debug, Clone, Serialize)]
pub struct GenusSummary {
    pub genus: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl Default for GenusSummary {
    fn default() -> Self {
        Self {
            genus: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            p25: f64::NAN,
            median: f64::NAN,
            p75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Planting-year distribution of one size class.
#[derive(Debug, Clone, Serialize)]
pub struct YearSummary {
    pub count: usize,
    pub mean_year: f64,
    pub earliest: Option<i32>,
    pub latest: Option<i32>,
}

/// Planting years of the large and small genera, side by side.
#[derive(Debug, Clone, Serialize)]
pub struct PlantingYears {
    pub large: YearSummary,
    pub small: YearSummary,
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> GenusSummary {
        let n = values.len();
        if n == 0 {
            return GenusSummary::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        // Sample std like pandas; undefined for a single value
        let std = if n > 1 {
            (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        GenusSummary {
            genus: String::new(),
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            p75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Summarise `measure` for every genus, in parallel. Sorted by genus name.
    pub fn describe_by_genus(records: &[TreeRecord], measure: Measure) -> Vec<GenusSummary> {
        let mut values_by_genus: HashMap<&str, Vec<f64>> = HashMap::new();
        for record in records {
            values_by_genus
                .entry(record.genus_name.as_str())
                .or_default()
                .push(measure.value(record));
        }

        let mut summaries: Vec<GenusSummary> = values_by_genus
            .into_par_iter()
            .map(|(genus, values)| {
                let mut summary = Self::compute_descriptive_stats(&values);
                summary.genus = genus.to_string();
                summary
            })
            .collect();
        summaries.sort_by(|a, b| a.genus.cmp(&b.genus));
        summaries
    }

    /// The `n` genera with the highest mean.
    pub fn largest_by_mean(summaries: &[GenusSummary], n: usize) -> Vec<GenusSummary> {
        let mut sorted = summaries.to_vec();
        sorted.sort_by(|a, b| {
            b.mean
                .partial_cmp(&a.mean)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.genus.cmp(&b.genus))
        });
        sorted.truncate(n);
        sorted
    }

    /// The `n` genera with the lowest mean.
    pub fn smallest_by_mean(summaries: &[GenusSummary], n: usize) -> Vec<GenusSummary> {
        let mut sorted = summaries.to_vec();
        sorted.sort_by(|a, b| {
            a.mean
                .partial_cmp(&b.mean)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.genus.cmp(&b.genus))
        });
        sorted.truncate(n);
        sorted
    }

    fn year_summary(years: &[f64]) -> YearSummary {
        let stats = Self::compute_descriptive_stats(years);
        YearSummary {
            count: stats.count,
            mean_year: stats.mean,
            earliest: (stats.count > 0).then_some(stats.min as i32),
            latest: (stats.count > 0).then_some(stats.max as i32),
        }
    }

    /// Planting-year summaries of large and small genera.
    ///
    /// Undated records do not take part.
    pub fn planting_years(large: &[&TreeRecord], small: &[&TreeRecord]) -> PlantingYears {
        let years = |records: &[&TreeRecord]| -> Vec<f64> {
            records
                .iter()
                .filter_map(|r| r.date_planted)
                .map(|d| d.year() as f64)
                .collect()
        };
        PlantingYears {
            large: Self::year_summary(&years(large)),
            small: Self::year_summary(&years(small)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dated, tree};

    #[test]
    fn test_descriptive_stats_match_pandas_describe() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.p25, 1.75);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.p75, 3.25);
        assert_eq!(stats.max, 4.0);
        assert!((stats.std - 1.2909944487358056).abs() < 1e-12);
    }

    #[test]
    fn test_measure_labels() {
        assert_eq!(Measure::Diameter.label(), "Diameter (in)");
        assert_eq!(Measure::HeightRange.label().to_lowercase(), "height range");
    }

    #[test]
    fn test_single_value_has_undefined_std() {
        let stats = StatsCalculator::compute_descriptive_stats(&[7.0]);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.median, 7.0);
        assert!(stats.std.is_nan());
    }

    #[test]
    fn test_describe_by_genus() {
        let mut records = vec![
            tree("Acer", "DUNBAR", 2),
            tree("Acer", "DUNBAR", 4),
            tree("Ulmus", "DUNBAR", 8),
        ];
        records[2].diameter = 30.0;

        let heights = StatsCalculator::describe_by_genus(&records, Measure::HeightRange);
        assert_eq!(heights.len(), 2);
        assert_eq!(heights[0].genus, "Acer");
        assert_eq!(heights[0].mean, 3.0);
        assert_eq!(heights[1].mean, 8.0);

        let diameters = StatsCalculator::describe_by_genus(&records, Measure::Diameter);
        assert_eq!(diameters[1].max, 30.0);
    }

    #[test]
    fn test_planting_years_without_dates() {
        let undated = vec![tree("Ulmus", "DUNBAR", 7)];
        let undated: Vec<&TreeRecord> = undated.iter().collect();

        let years = StatsCalculator::planting_years(&undated, &[]);
        assert_eq!(years.large.count, 0);
        assert_eq!(years.large.earliest, None);
        assert!(years.small.mean_year.is_nan());
    }

    #[test]
    fn test_largest_and_smallest_by_mean() {
        let summaries: Vec<GenusSummary> = [("A", 1.0), ("B", 5.0), ("C", 3.0), ("D", 5.0)]
            .iter()
            .map(|(g, m)| GenusSummary {
                genus: g.to_string(),
                mean: *m,
                ..Default::default()
            })
            .collect();

        let largest: Vec<String> = StatsCalculator::largest_by_mean(&summaries, 2)
            .into_iter()
            .map(|s| s.genus)
            .collect();
        assert_eq!(largest, vec!["B", "D"]);

        let smallest: Vec<String> = StatsCalculator::smallest_by_mean(&summaries, 2)
            .into_iter()
            .map(|s| s.genus)
            .collect();
        assert_eq!(smallest, vec!["A", "C"]);
    }

    #[test]
    fn test_planting_years_ignore_undated() {
        let large = vec![
            dated(tree("Ulmus", "DUNBAR", 7), 1960, 5, 1),
            dated(tree("Ulmus", "DUNBAR", 7), 1962, 5, 1),
            dated(tree("Ulmus", "DUNBAR", 7), 1961, 5, 1),
            tree("Ulmus", "DUNBAR", 7),
        ];
        let small = vec![
            dated(tree("Cercis", "SUNSET", 1), 2010, 1, 1),
            dated(tree("Cercis", "SUNSET", 1), 2012, 1, 1),
            dated(tree("Cercis", "SUNSET", 1), 2011, 1, 1),
        ];
        let large: Vec<&TreeRecord> = large.iter().collect();
        let small: Vec<&TreeRecord> = small.iter().collect();

        let years = StatsCalculator::planting_years(&large, &small);
        assert_eq!(years.large.count, 3);
        assert_eq!(years.large.earliest, Some(1960));
        assert_eq!(years.large.mean_year, 1961.0);
        assert_eq!(years.small.latest, Some(2012));
        assert_eq!(years.small.mean_year, 2011.0);
    }
}
