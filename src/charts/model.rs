//! Chart Data Models
//! Plot-ready data for the four static charts, shared by the interactive
//! viewer and the PNG renderer.

use super::tooltip;
use crate::data::{DataProcessor, NeighbourhoodAxis, SizeClass, TreeRecord};
use crate::selection::date_axis_value;
use std::collections::BTreeSet;

/// The four static charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Ubiquitous,
    LargeTrees,
    SmallTrees,
    PlantingDates,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Ubiquitous,
        ChartKind::LargeTrees,
        ChartKind::SmallTrees,
        ChartKind::PlantingDates,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Ubiquitous => "Height and diameter among the most common genera",
            ChartKind::LargeTrees => "Genera with the largest trees, by neighbourhood",
            ChartKind::SmallTrees => "Genera with the smallest trees, by neighbourhood",
            ChartKind::PlantingDates => "Planting date of small and large trees",
        }
    }

    pub fn tab_label(&self) -> &'static str {
        match self {
            ChartKind::Ubiquitous => "Common genera",
            ChartKind::LargeTrees => "Large trees",
            ChartKind::SmallTrees => "Small trees",
            ChartKind::PlantingDates => "Planting dates",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ChartKind::Ubiquitous => "1_common_genera.png",
            ChartKind::LargeTrees => "2_large_trees.png",
            ChartKind::SmallTrees => "3_small_trees.png",
            ChartKind::PlantingDates => "4_planting_dates.png",
        }
    }
}

/// One facet of the height/diameter scatter.
#[derive(Debug, Clone)]
pub struct FacetPanel {
    pub genus: String,
    /// (height range, diameter)
    pub points: Vec<[f64; 2]>,
    /// Hover text, parallel to `points`
    pub tooltips: Vec<String>,
}

/// Height/diameter scatter faceted by genus.
#[derive(Debug, Clone, Default)]
pub struct FacetChart {
    pub panels: Vec<FacetPanel>,
    pub max_diameter: f64,
}

impl FacetChart {
    pub const COLUMNS: usize = 2;

    /// One panel per genus, in the given order.
    pub fn build(records: &[TreeRecord], genera: &[String]) -> Self {
        let panels: Vec<FacetPanel> = genera
            .iter()
            .map(|genus| {
                let members: Vec<&TreeRecord> =
                    records.iter().filter(|r| &r.genus_name == genus).collect();
                FacetPanel {
                    genus: genus.clone(),
                    points: members
                        .iter()
                        .map(|r| [r.height_range_id as f64, r.diameter])
                        .collect(),
                    tooltips: members.iter().map(|r| tooltip::species(r)).collect(),
                }
            })
            .collect();

        let max_diameter = panels
            .iter()
            .flat_map(|p| p.points.iter().map(|pt| pt[1]))
            .fold(0.0, f64::max);

        Self {
            panels,
            max_diameter,
        }
    }

    pub fn rows(&self) -> usize {
        self.panels.len().div_ceil(Self::COLUMNS)
    }
}

/// A run of one genus within a neighbourhood bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSegment {
    pub neighbourhood: usize,
    pub genus: usize,
    pub start: f64,
    pub count: f64,
}

/// Horizontal bars of tree counts per neighbourhood, stacked by genus.
#[derive(Debug, Clone, Default)]
pub struct StackedBarChart {
    pub neighbourhoods: Vec<String>,
    pub genera: Vec<String>,
    pub segments: Vec<BarSegment>,
    pub max_total: f64,
}

impl StackedBarChart {
    pub fn build(records: &[&TreeRecord]) -> Self {
        let counts = DataProcessor::count_by_neighbourhood(records);

        let neighbourhoods: Vec<String> = counts
            .iter()
            .map(|(n, _, _)| n.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let genera: Vec<String> = counts
            .iter()
            .map(|(_, g, _)| g.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut segments = Vec::with_capacity(counts.len());
        let mut totals = vec![0.0; neighbourhoods.len()];
        for (neighbourhood, genus, count) in counts {
            // Both lists were built from `counts`, so the lookups succeed
            let (Ok(n), Ok(g)) = (
                neighbourhoods.binary_search(&neighbourhood),
                genera.binary_search(&genus),
            ) else {
                continue;
            };
            segments.push(BarSegment {
                neighbourhood: n,
                genus: g,
                start: totals[n],
                count: count as f64,
            });
            totals[n] += count as f64;
        }

        let max_total = totals.iter().copied().fold(0.0, f64::max);
        Self {
            neighbourhoods,
            genera,
            segments,
            max_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RugTick {
    /// Days since epoch
    pub x: f64,
    /// Neighbourhood position
    pub y: f64,
    pub size: SizeClass,
    pub tooltip: String,
}

/// Planting dates by neighbourhood, colored by size class.
#[derive(Debug, Clone, Default)]
pub struct RugChart {
    pub neighbourhoods: Vec<String>,
    pub ticks: Vec<RugTick>,
    /// Records left out for lack of a planting date
    pub undated: usize,
    pub x_range: Option<(f64, f64)>,
}

impl RugChart {
    pub fn build(labelled: &[(&TreeRecord, SizeClass)]) -> Self {
        let axis =
            NeighbourhoodAxis::from_names(labelled.iter().map(|(r, _)| r.neighbourhood_name.as_str()));

        let mut ticks = Vec::new();
        let mut undated = 0;
        for (record, size) in labelled {
            match (record.date_planted, axis.position(&record.neighbourhood_name)) {
                (Some(date), Some(position)) => ticks.push(RugTick {
                    x: date_axis_value(date),
                    y: position as f64,
                    size: *size,
                    tooltip: tooltip::planting(record),
                }),
                _ => undated += 1,
            }
        }

        let x_range = ticks.iter().fold(None, |range, t| match range {
            None => Some((t.x, t.x)),
            Some((lo, hi)) => Some((f64::min(lo, t.x), f64::max(hi, t.x))),
        });

        Self {
            neighbourhoods: axis.names().to_vec(),
            ticks,
            undated,
            x_range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dated, tree};

    #[test]
    fn test_facet_chart() {
        let mut records = vec![
            tree("Acer", "DUNBAR", 2),
            tree("Prunus", "DUNBAR", 1),
            tree("Acer", "SUNSET", 5),
            tree("Tilia", "SUNSET", 4),
        ];
        records[2].diameter = 42.0;

        let chart = FacetChart::build(&records, &["Prunus".to_string(), "Acer".to_string(), "Tilia".to_string()]);
        assert_eq!(chart.panels.len(), 3);
        assert_eq!(chart.rows(), 2);
        assert_eq!(chart.panels[0].genus, "Prunus");
        assert_eq!(chart.panels[1].points, vec![[2.0, 10.0], [5.0, 42.0]]);
        assert_eq!(chart.max_diameter, 42.0);
        assert_eq!(chart.panels[1].tooltips.len(), 2);
        assert!(chart.panels[1].tooltips[0].starts_with("Species: TEST"));
    }

    #[test]
    fn test_stacked_bars() {
        let records = vec![
            tree("Ulmus", "SHAUGHNESSY", 7),
            tree("Aesculus", "DUNBAR", 6),
            tree("Ulmus", "DUNBAR", 7),
            tree("Ulmus", "DUNBAR", 8),
        ];
        let refs: Vec<&TreeRecord> = records.iter().collect();
        let chart = StackedBarChart::build(&refs);

        assert_eq!(chart.neighbourhoods, vec!["DUNBAR", "SHAUGHNESSY"]);
        assert_eq!(chart.genera, vec!["Aesculus", "Ulmus"]);
        assert_eq!(
            chart.segments[1],
            BarSegment {
                neighbourhood: 0,
                genus: 1,
                start: 1.0,
                count: 2.0
            }
        );
        assert_eq!(chart.max_total, 3.0);
    }

    #[test]
    fn test_rug_drops_undated_explicitly() {
        let small = dated(tree("Cercis", "SUNSET", 1), 2012, 4, 2);
        let large = dated(tree("Ulmus", "DUNBAR", 7), 1958, 1, 1);
        let undated = tree("Ulmus", "DUNBAR", 7);
        let labelled = vec![
            (&small, SizeClass::Small),
            (&large, SizeClass::Large),
            (&undated, SizeClass::Large),
        ];

        let chart = RugChart::build(&labelled);
        assert_eq!(chart.ticks.len(), 2);
        assert_eq!(chart.undated, 1);
        assert_eq!(chart.ticks[0].y, 1.0);
        assert_eq!(chart.ticks[1].size, SizeClass::Large);
        assert!(chart.ticks[1].tooltip.starts_with("Genus: Ulmus\nHeight range: 7"));
        let (lo, hi) = chart.x_range.unwrap();
        assert!(lo < hi);
    }
}
