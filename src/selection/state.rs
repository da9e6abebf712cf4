//! Selection State
//! The three linked selection predicates shared by the dashboard views.

use crate::data::MAX_HEIGHT_RANGE;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("Unknown genus '{0}'")]
    UnknownGenus(String),
    #[error("Height threshold {0} is outside 0..={max}", max = MAX_HEIGHT_RANGE)]
    HeightOutOfRange(u8),
    #[error("Brush bounds must be finite")]
    InvalidBrush,
}

/// Closed interval on one plot axis. Bounds are kept ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    lo: f64,
    hi: f64,
}

impl Interval {
    /// Build from two drag endpoints in either order.
    pub fn new(a: f64, b: f64) -> Self {
        // f64::min would swallow a NaN bound
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Self { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    fn is_finite(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
}

/// Number of days since 1970-01-01, the x coordinate of the date-planted view.
pub fn date_axis_value(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

/// Inverse of [`date_axis_value`], truncating to whole days.
pub fn date_from_axis(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() {
        return None;
    }
    NaiveDate::default().checked_add_signed(chrono::Duration::try_days(value.floor() as i64)?)
}

/// Rectangle drawn over the date-planted view: planting dates by
/// neighbourhood ordinal positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub dates: Interval,
    pub neighbourhoods: Interval,
}

impl Brush {
    pub fn new(dates: Interval, neighbourhoods: Interval) -> Self {
        Self {
            dates,
            neighbourhoods,
        }
    }

    /// Brush spanning two plot-space corners.
    pub fn from_corners(a: [f64; 2], b: [f64; 2]) -> Self {
        Self::new(Interval::new(a[0], b[0]), Interval::new(a[1], b[1]))
    }

    pub fn contains(&self, date: NaiveDate, neighbourhood_position: usize) -> bool {
        self.dates.contains(date_axis_value(date))
            && self.neighbourhoods.contains(neighbourhood_position as f64)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.dates.is_finite() && self.neighbourhoods.is_finite()
    }
}

/// Current selection of one dashboard session.
///
/// `selected_genus == None` matches no record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub(crate) selected_genus: Option<String>,
    pub(crate) height_threshold: u8,
    pub(crate) brush: Option<Brush>,
}

impl SelectionState {
    pub fn selected_genus(&self) -> Option<&str> {
        self.selected_genus.as_deref()
    }

    pub fn height_threshold(&self) -> u8 {
        self.height_threshold
    }

    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }
}
