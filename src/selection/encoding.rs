//! Derived Encodings
//! Presentation attributes of every mark, as pure functions of a record and
//! the current selection state.

use crate::data::{NeighbourhoodAxis, TreeRecord};
use crate::selection::state::{date_axis_value, Brush, SelectionState};

/// Opacity of marks passing the height predicate.
pub const VISIBLE_OPACITY: f32 = 0.9;

/// Emphasized marks use blue, everything else green.
pub const EMPHASIZED_RGB: (u8, u8, u8) = (0, 0, 255);
pub const DE_EMPHASIZED_RGB: (u8, u8, u8) = (0, 128, 0);

/// The two linked dashboard views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Date planted by neighbourhood; carries the brush.
    DatePlanted,
    /// Height range by diameter; filtered by the brush.
    Size,
}

impl View {
    /// Opacity of marks failing the height predicate.
    pub fn hidden_opacity(&self) -> f32 {
        match self {
            View::DatePlanted => 0.01,
            View::Size => 0.0,
        }
    }

    /// Marker area (px²) for each emphasis.
    pub fn marker_size(&self, emphasis: Emphasis) -> f32 {
        match (self, emphasis) {
            (View::DatePlanted, Emphasis::Emphasized) => 100.0,
            (View::Size, Emphasis::Emphasized) => 75.0,
            (_, Emphasis::DeEmphasized) => 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emphasis {
    Emphasized,
    DeEmphasized,
}

impl Emphasis {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Emphasis::Emphasized => EMPHASIZED_RGB,
            Emphasis::DeEmphasized => DE_EMPHASIZED_RGB,
        }
    }
}

/// Presentation attributes of one mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkEncoding {
    pub emphasis: Emphasis,
    pub opacity: f32,
    /// Marker area in px²
    pub size: f32,
}

/// One plotted record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    /// Index into the record slice
    pub record: usize,
    pub x: f64,
    pub y: f64,
    pub encoding: MarkEncoding,
}

/// Marks of both dashboard views for one selection state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFrame {
    pub date_view: Vec<Mark>,
    pub size_view: Vec<Mark>,
}

pub fn passes_height(record: &TreeRecord, threshold: u8) -> bool {
    record.height_range_id <= threshold
}

/// With no genus selected nothing is emphasized.
pub fn emphasis(record: &TreeRecord, selected_genus: Option<&str>) -> Emphasis {
    match selected_genus {
        Some(genus) if record.genus_name == genus => Emphasis::Emphasized,
        _ => Emphasis::DeEmphasized,
    }
}

pub fn opacity(record: &TreeRecord, threshold: u8, view: View) -> f32 {
    if passes_height(record, threshold) {
        VISIBLE_OPACITY
    } else {
        view.hidden_opacity()
    }
}

pub fn encode(record: &TreeRecord, state: &SelectionState, view: View) -> MarkEncoding {
    let emphasis = emphasis(record, state.selected_genus());
    MarkEncoding {
        emphasis,
        opacity: opacity(record, state.height_threshold(), view),
        size: view.marker_size(emphasis),
    }
}

/// Whether the size view shows `record`. Undated records never lie in a brush.
pub fn in_brush(record: &TreeRecord, axis: &NeighbourhoodAxis, brush: Option<&Brush>) -> bool {
    let Some(brush) = brush else {
        return true;
    };

    match (record.date_planted, axis.position(&record.neighbourhood_name)) {
        (Some(date), Some(position)) => brush.contains(date, position),
        _ => false,
    }
}

/// Date-planted view: x = days since epoch, y = neighbourhood position.
/// Undated records have no place on this view and are left out.
pub fn render_date_view(
    records: &[TreeRecord],
    axis: &NeighbourhoodAxis,
    state: &SelectionState,
) -> Vec<Mark> {
    records
        .iter()
        .enumerate()
        .filter_map(|(i, record)| {
            let date = record.date_planted?;
            let position = axis.position(&record.neighbourhood_name)?;
            Some(Mark {
                record: i,
                x: date_axis_value(date),
                y: position as f64,
                encoding: encode(record, state, View::DatePlanted),
            })
        })
        .collect()
}

/// Size view: x = height range, y = diameter, restricted to the brush.
pub fn render_size_view(
    records: &[TreeRecord],
    axis: &NeighbourhoodAxis,
    state: &SelectionState,
) -> Vec<Mark> {
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| in_brush(record, axis, state.brush()))
        .map(|(i, record)| Mark {
            record: i,
            x: record.height_range_id as f64,
            y: record.diameter,
            encoding: encode(record, state, View::Size),
        })
        .collect()
}

pub fn render(
    records: &[TreeRecord],
    axis: &NeighbourhoodAxis,
    state: &SelectionState,
) -> DashboardFrame {
    DashboardFrame {
        date_view: render_date_view(records, axis, state),
        size_view: render_size_view(records, axis, state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{dated, tree};
    use crate::data::MAX_HEIGHT_RANGE;
    use crate::selection::state::{Brush, Interval};
    use crate::selection::SelectionCoordinator;
    use chrono::NaiveDate;

    fn state(genus: Option<&str>, threshold: u8) -> SelectionState {
        SelectionState {
            selected_genus: genus.map(str::to_string),
            height_threshold: threshold,
            brush: None,
        }
    }

    #[test]
    fn test_height_predicate_boundaries() {
        for h in 0..=MAX_HEIGHT_RANGE {
            let record = tree("Acer", "DUNBAR", h);
            assert_eq!(opacity(&record, h, View::DatePlanted), VISIBLE_OPACITY);
            if h > 0 {
                assert_eq!(opacity(&record, h - 1, View::DatePlanted), 0.01);
                assert_eq!(opacity(&record, h - 1, View::Size), 0.0);
            }
        }
    }

    #[test]
    fn test_threshold_scenario_two_five_eight() {
        let records: Vec<TreeRecord> = [2, 5, 8].iter().map(|h| tree("Acer", "DUNBAR", *h)).collect();
        let passing: Vec<bool> = records.iter().map(|r| passes_height(r, 5)).collect();
        assert_eq!(passing, vec![true, true, false]);
    }

    #[test]
    fn test_max_threshold_shows_everything() {
        let records: Vec<TreeRecord> = (0..=MAX_HEIGHT_RANGE)
            .map(|h| dated(tree("Acer", "DUNBAR", h), 2000, 1, 1))
            .collect();
        let axis = NeighbourhoodAxis::from_records(&records);

        let frame = render(&records, &axis, &state(None, MAX_HEIGHT_RANGE));
        assert!(frame
            .date_view
            .iter()
            .chain(frame.size_view.iter())
            .all(|m| m.encoding.opacity == VISIBLE_OPACITY));
    }

    #[test]
    fn test_genus_scenario_acer_ulmus_acer() {
        let records = vec![
            tree("Acer", "DUNBAR", 1),
            tree("Ulmus", "DUNBAR", 1),
            tree("Acer", "DUNBAR", 1),
        ];
        let s = state(Some("Acer"), 0);

        let encodings: Vec<MarkEncoding> = records.iter().map(|r| encode(r, &s, View::Size)).collect();
        assert_eq!(encodings[0].emphasis, Emphasis::Emphasized);
        assert_eq!(encodings[1].emphasis, Emphasis::DeEmphasized);
        assert_eq!(encodings[2].emphasis, Emphasis::Emphasized);
        assert_eq!(encodings[0].size, 75.0);
        assert_eq!(encodings[1].size, 25.0);
        assert_eq!(encode(&records[0], &s, View::DatePlanted).size, 100.0);
        assert_eq!(encodings[0].emphasis.rgb(), EMPHASIZED_RGB);
    }

    // Literal behaviour of the original dashboard: until a genus is picked,
    // nothing is highlighted.
    #[test]
    fn test_no_genus_selected_de_emphasizes_everything() {
        let records = vec![tree("Acer", "DUNBAR", 1), tree("Ulmus", "SUNSET", 4)];
        let s = SelectionState::default();
        assert!(records
            .iter()
            .all(|r| encode(r, &s, View::DatePlanted).emphasis == Emphasis::DeEmphasized));
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let record = tree("Acer", "DUNBAR", 3);
        let s = state(Some("Acer"), 4);
        assert_eq!(encode(&record, &s, View::Size), encode(&record, &s, View::Size));

        let records = vec![record, dated(tree("Ulmus", "SUNSET", 7), 1990, 3, 3)];
        let axis = NeighbourhoodAxis::from_records(&records);
        assert_eq!(render(&records, &axis, &s), render(&records, &axis, &s));
    }

    #[test]
    fn test_date_view_excludes_undated_records() {
        let records = vec![
            dated(tree("Acer", "DUNBAR", 1), 1999, 1, 13),
            tree("Ulmus", "SUNSET", 2),
        ];
        let axis = NeighbourhoodAxis::from_records(&records);

        let marks = render_date_view(&records, &axis, &SelectionState::default());
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].record, 0);
        assert_eq!(marks[0].y, 0.0);
        assert_eq!(
            marks[0].x,
            date_axis_value(NaiveDate::from_ymd_opt(1999, 1, 13).unwrap())
        );
    }

    #[test]
    fn test_brush_filters_size_view_and_clearing_resets() {
        let records = vec![
            dated(tree("Acer", "DUNBAR", 1), 1999, 1, 13),
            dated(tree("Acer", "KITSILANO", 2), 2010, 6, 1),
            dated(tree("Ulmus", "SUNSET", 3), 1999, 6, 1),
            tree("Ulmus", "DUNBAR", 4),
        ];
        let axis = NeighbourhoodAxis::from_records(&records);
        let mut coordinator = SelectionCoordinator::new(vec!["Acer".into(), "Ulmus".into()]);

        let all = render_size_view(&records, &axis, coordinator.state());
        assert_eq!(all.len(), 4);

        let start = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();
        let brush = Brush::new(
            Interval::new(date_axis_value(start), date_axis_value(end)),
            Interval::new(-0.5, 1.5),
        );
        coordinator.set_brush(Some(brush)).unwrap();

        let brushed = render_size_view(&records, &axis, coordinator.state());
        let kept: Vec<usize> = brushed.iter().map(|m| m.record).collect();
        assert_eq!(kept, vec![0]);

        coordinator.set_brush(None).unwrap();
        assert_eq!(render_size_view(&records, &axis, coordinator.state()), all);
    }

    #[test]
    fn test_brush_does_not_change_date_view() {
        let records = vec![
            dated(tree("Acer", "DUNBAR", 1), 1999, 1, 13),
            dated(tree("Acer", "KITSILANO", 2), 2010, 6, 1),
        ];
        let axis = NeighbourhoodAxis::from_records(&records);
        let mut s = SelectionState::default();
        let before = render_date_view(&records, &axis, &s);

        s.brush = Some(Brush::from_corners([0.0, 0.0], [1.0, 0.0]));
        assert_eq!(render_date_view(&records, &axis, &s), before);
    }
}
