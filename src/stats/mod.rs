//! Stats module - Descriptive statistics per genus and planting year

mod calculator;

pub use calculator::{GenusSummary, Measure, PlantingYears, StatsCalculator, YearSummary};
