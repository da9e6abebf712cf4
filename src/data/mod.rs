//! Data module - CSV loading, typed records and processing

mod loader;
mod processor;
mod record;

pub use loader::{DataSource, TreeLoader, DEFAULT_TREES_URL};
pub use processor::{DataProcessor, SizeClass, UBIQUITOUS_MIN_COUNT};
pub use record::{GenusCount, NeighbourhoodAxis, TreeDataset, TreeRecord, MAX_HEIGHT_RANGE};

#[cfg(test)]
pub(crate) use record::tests as fixtures;
