//! Charts module - Chart data, interactive plotting and static rendering

mod model;
mod plotter;
mod renderer;
mod tooltip;

pub use model::{ChartKind, FacetChart, RugChart, StackedBarChart};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
