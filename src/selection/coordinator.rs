//! Cross-View Selection Coordinator
//! Owns the selection state; views read it, only these operations change it.

use crate::data::MAX_HEIGHT_RANGE;
use crate::selection::state::{Brush, SelectionError, SelectionState};
use log::debug;

/// Translates the dropdown, slider and brush into one consistent state.
#[derive(Debug, Clone, Default)]
pub struct SelectionCoordinator {
    state: SelectionState,
    genera: Vec<String>,
    generation: u64,
}

impl SelectionCoordinator {
    /// Start a session with default selections over the given dropdown options.
    pub fn new(genera: Vec<String>) -> Self {
        Self {
            state: SelectionState::default(),
            genera,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Dropdown options.
    pub fn genera(&self) -> &[String] {
        &self.genera
    }

    /// Bumped on every change that affects rendering.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Select a genus, or `None` for no selection.
    pub fn set_genus(&mut self, genus: Option<&str>) -> Result<(), SelectionError> {
        if let Some(name) = genus {
            if !self.genera.iter().any(|g| g == name) {
                return Err(SelectionError::UnknownGenus(name.to_string()));
            }
        }

        let genus = genus.map(str::to_string);
        if self.state.selected_genus != genus {
            debug!("Genus selection: {:?}", genus);
            self.state.selected_genus = genus;
            self.generation += 1;
        }
        Ok(())
    }

    /// Set the height-range threshold. Values above 9 are rejected, not clamped.
    pub fn set_height_threshold(&mut self, threshold: u8) -> Result<(), SelectionError> {
        if threshold > MAX_HEIGHT_RANGE {
            return Err(SelectionError::HeightOutOfRange(threshold));
        }

        if self.state.height_threshold != threshold {
            debug!("Height threshold: {}", threshold);
            self.state.height_threshold = threshold;
            self.generation += 1;
        }
        Ok(())
    }

    /// Set or clear the brushed interval. Clearing restores the full record set.
    pub fn set_brush(&mut self, brush: Option<Brush>) -> Result<(), SelectionError> {
        if let Some(b) = &brush {
            if !b.is_finite() {
                return Err(SelectionError::InvalidBrush);
            }
        }

        if self.state.brush != brush {
            debug!("Brush: {:?}", brush);
            self.state.brush = brush;
            self.generation += 1;
        }
        Ok(())
    }
}
