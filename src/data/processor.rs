//! Data Processor Module
//! Genus filtering and size labelling over loaded records.

use crate::data::record::{GenusCount, TreeRecord};
use std::collections::HashSet;

/// Genera with more trees than this are considered ubiquitous.
pub const UBIQUITOUS_MIN_COUNT: usize = 100;

/// Categorical size label used by the planting-date rug plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum SizeClass {
    Small,
    Large,
}

impl SizeClass {
    pub fn label(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Large => "large",
        }
    }
}

/// Handles record selection and labelling operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Genera whose count is strictly greater than `min_count`, keeping count order.
    pub fn ubiquitous_genera(counts: &[GenusCount], min_count: usize) -> Vec<String> {
        counts
            .iter()
            .filter(|gc| gc.count > min_count)
            .map(|gc| gc.genus.clone())
            .collect()
    }

    /// Records whose genus is in `genera`.
    pub fn filter_genera<'a>(
        records: &'a [TreeRecord],
        genera: &HashSet<String>,
    ) -> Vec<&'a TreeRecord> {
        records
            .iter()
            .filter(|r| genera.contains(&r.genus_name))
            .collect()
    }

    /// Concatenate small-genus then large-genus records with their size label.
    pub fn label_sizes<'a>(
        small: &[&'a TreeRecord],
        large: &[&'a TreeRecord],
    ) -> Vec<(&'a TreeRecord, SizeClass)> {
        small
            .iter()
            .map(|r| (*r, SizeClass::Small))
            .chain(large.iter().map(|r| (*r, SizeClass::Large)))
            .collect()
    }

    /// Count records per (neighbourhood, genus), sorted by neighbourhood then genus.
    pub fn count_by_neighbourhood(records: &[&TreeRecord]) -> Vec<(String, String, usize)> {
        let mut counts: std::collections::BTreeMap<(&str, &str), usize> =
            std::collections::BTreeMap::new();
        for record in records {
            *counts
                .entry((
                    record.neighbourhood_name.as_str(),
                    record.genus_name.as_str(),
                ))
                .or_default() += 1;
        }

        counts
            .into_iter()
            .map(|((n, g), c)| (n.to_string(), g.to_string(), c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::tests::tree;

    #[test]
    fn test_ubiquitous_is_strictly_greater() {
        let counts = vec![
            GenusCount {
                genus: "Prunus".to_string(),
                count: 250,
            },
            GenusCount {
                genus: "Acer".to_string(),
                count: 101,
            },
            GenusCount {
                genus: "Tilia".to_string(),
                count: 100,
            },
        ];
        assert_eq!(
            DataProcessor::ubiquitous_genera(&counts, UBIQUITOUS_MIN_COUNT),
            vec!["Prunus", "Acer"]
        );
    }

    #[test]
    fn test_filter_and_label() {
        let records = vec![
            tree("Cercis", "SUNSET", 1),
            tree("Ulmus", "DUNBAR", 7),
            tree("Acer", "DUNBAR", 3),
            tree("Syringa", "SUNSET", 0),
        ];
        let small: HashSet<String> = ["Cercis", "Syringa"].iter().map(|s| s.to_string()).collect();
        let large: HashSet<String> = ["Ulmus"].iter().map(|s| s.to_string()).collect();

        let small = DataProcessor::filter_genera(&records, &small);
        let large = DataProcessor::filter_genera(&records, &large);
        assert_eq!(small.len(), 2);
        assert_eq!(large.len(), 1);

        let labelled = DataProcessor::label_sizes(&small, &large);
        assert_eq!(labelled.len(), 3);
        assert_eq!(labelled[0].1, SizeClass::Small);
        assert_eq!(labelled[2].0.genus_name, "Ulmus");
        assert_eq!(labelled[2].1.label(), "large");
    }

    #[test]
    fn test_count_by_neighbourhood() {
        let records = vec![
            tree("Ulmus", "SHAUGHNESSY", 7),
            tree("Aesculus", "DUNBAR", 6),
            tree("Ulmus", "DUNBAR", 7),
            tree("Ulmus", "DUNBAR", 8),
        ];
        let refs: Vec<&TreeRecord> = records.iter().collect();

        let counts = DataProcessor::count_by_neighbourhood(&refs);
        assert_eq!(
            counts,
            vec![
                ("DUNBAR".to_string(), "Aesculus".to_string(), 1),
                ("DUNBAR".to_string(), "Ulmus".to_string(), 2),
                ("SHAUGHNESSY".to_string(), "Ulmus".to_string(), 1),
            ]
        );
    }
}
