//! Tree Record Module
//! Typed street-tree records and the read-only dataset built from them.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Highest height-range bucket (90-100ft+).
pub const MAX_HEIGHT_RANGE: u8 = 9;

/// One street tree.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRecord {
    pub species_name: String,
    pub genus_name: String,
    pub neighbourhood_name: String,
    pub date_planted: Option<NaiveDate>,
    /// Trunk diameter in inches
    pub diameter: f64,
    /// 10-foot height band, 0..=9
    pub height_range_id: u8,
}

/// Number of trees of one genus.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GenusCount {
    pub genus: String,
    pub count: usize,
}

/// Ordinal positions of neighbourhoods on a categorical axis.
///
/// Names are sorted ascending, position 0 is the first name.
#[derive(Debug, Clone, Default)]
pub struct NeighbourhoodAxis {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl NeighbourhoodAxis {
    pub fn from_records(records: &[TreeRecord]) -> Self {
        Self::from_names(records.iter().map(|r| r.neighbourhood_name.as_str()))
    }

    /// Axis over the distinct names, duplicates allowed in the input.
    pub fn from_names<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        let names: Vec<String> = names
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self { names, positions }
    }

    /// Ordinal position of a neighbourhood, if it is on the axis.
    pub fn position(&self, neighbourhood: &str) -> Option<usize> {
        self.positions.get(neighbourhood).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Immutable set of loaded records with the lookups every view needs.
#[derive(Debug, Clone, Default)]
pub struct TreeDataset {
    records: Vec<TreeRecord>,
    genus_counts: Vec<GenusCount>,
    neighbourhoods: NeighbourhoodAxis,
}

impl TreeDataset {
    pub fn new(records: Vec<TreeRecord>) -> Self {
        let genus_counts = Self::count_genera(&records);
        let neighbourhoods = NeighbourhoodAxis::from_records(&records);
        Self {
            records,
            genus_counts,
            neighbourhoods,
        }
    }

    /// Genus value counts, most common first. Ties are ordered by name.
    fn count_genera(records: &[TreeRecord]) -> Vec<GenusCount> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.genus_name.as_str()).or_default() += 1;
        }

        let mut counts: Vec<GenusCount> = counts
            .into_iter()
            .map(|(genus, count)| GenusCount {
                genus: genus.to_string(),
                count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.genus.cmp(&b.genus)));
        counts
    }

    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }

    pub fn genus_counts(&self) -> &[GenusCount] {
        &self.genus_counts
    }

    /// Genus names in value-count order (dropdown options).
    pub fn genus_options(&self) -> Vec<String> {
        self.genus_counts.iter().map(|gc| gc.genus.clone()).collect()
    }

    pub fn neighbourhoods(&self) -> &NeighbourhoodAxis {
        &self.neighbourhoods
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with a planting date.
    pub fn dated_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.date_planted.is_some())
            .count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn tree(genus: &str, neighbourhood: &str, height: u8) -> TreeRecord {
        TreeRecord {
            species_name: "TEST".to_string(),
            genus_name: genus.to_string(),
            neighbourhood_name: neighbourhood.to_string(),
            date_planted: None,
            diameter: 10.0,
            height_range_id: height,
        }
    }

    pub(crate) fn dated(mut record: TreeRecord, y: i32, m: u32, d: u32) -> TreeRecord {
        record.date_planted = NaiveDate::from_ymd_opt(y, m, d);
        record
    }

    #[test]
    fn test_genus_counts_sorted_by_count_then_name() {
        let dataset = TreeDataset::new(vec![
            tree("Ulmus", "KITSILANO", 1),
            tree("Acer", "DUNBAR", 1),
            tree("Prunus", "DUNBAR", 1),
            tree("Acer", "KITSILANO", 2),
            tree("Prunus", "SUNSET", 2),
        ]);

        let counts = dataset.genus_counts();
        assert_eq!(counts[0].genus, "Acer");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].genus, "Prunus");
        assert_eq!(counts[2].genus, "Ulmus");
        assert_eq!(dataset.genus_options(), vec!["Acer", "Prunus", "Ulmus"]);
    }

    #[test]
    fn test_neighbourhood_axis_is_sorted() {
        let dataset = TreeDataset::new(vec![
            tree("Acer", "SUNSET", 1),
            tree("Acer", "DUNBAR", 1),
            tree("Acer", "KITSILANO", 1),
            tree("Acer", "DUNBAR", 1),
        ]);

        let axis = dataset.neighbourhoods();
        assert_eq!(axis.len(), 3);
        assert_eq!(axis.position("DUNBAR"), Some(0));
        assert_eq!(axis.position("SUNSET"), Some(2));
        assert_eq!(axis.position("MARPOLE"), None);
        assert_eq!(axis.names()[1], "KITSILANO");
    }

    #[test]
    fn test_axis_from_names_dedups_and_sorts() {
        let axis = NeighbourhoodAxis::from_names(["SUNSET", "DUNBAR", "SUNSET"].into_iter());
        assert_eq!(axis.names(), ["DUNBAR".to_string(), "SUNSET".to_string()]);
        assert_eq!(axis.position("SUNSET"), Some(1));
    }

    #[test]
    fn test_dated_count() {
        let dataset = TreeDataset::new(vec![
            dated(tree("Acer", "DUNBAR", 1), 1999, 1, 13),
            tree("Acer", "DUNBAR", 1),
        ]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dated_count(), 1);
    }
}
