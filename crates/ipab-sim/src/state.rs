//! Exported simulator state document.

use ipab_core::beamforming::ArrayConfig;
use serde::{Deserialize, Serialize};

/// Version written into exported documents
pub const STATE_VERSION: &str = "1.0";

/// Self-contained snapshot of every array plus the current index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorState {
    pub version: String,
    pub arrays: Vec<ArrayConfig>,
    pub current_array_index: usize,
}

impl Default for SimulatorState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION.to_string(),
            arrays: Vec::new(),
            current_array_index: 0,
        }
    }
}

/// One quick-save slot: the current array at the time it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickSave {
    pub name: String,
    pub array: ArrayConfig,
    pub array_index: usize,
    pub arrays_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_defaults() {
        let state: SimulatorState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.arrays.is_empty());
        assert_eq!(state.current_array_index, 0);
    }
}
