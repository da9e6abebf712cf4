//! Selection module - linked dashboard selections and derived encodings

mod coordinator;
mod encoding;
mod state;

pub use coordinator::SelectionCoordinator;
pub use encoding::{render, DashboardFrame, Emphasis, Mark, MarkEncoding};
pub use state::{date_axis_value, date_from_axis, Brush, SelectionError};

#[cfg(test)]
pub(crate) use encoding::VISIBLE_OPACITY;
