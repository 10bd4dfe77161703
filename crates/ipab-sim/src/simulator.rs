//! Beamforming Simulator
//!
//! Session object holding a collection of phased arrays, the scenario
//! library and a bounded list of quick saves.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                      Simulator                       │
//! │                                                      │
//! │  scenarios ──load_scenario──► arrays[0..n] ◄── current│
//! │      ▲                           │                   │
//! │      └────save_scenario──────────┤                   │
//! │                                  ▼                   │
//! │  quick_saves ◄──quick_save── current array           │
//! │                                                      │
//! │  export_state() / import_state()  (replace-all)      │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, HashSet, VecDeque};

use ipab_core::beamforming::{ArrayConfig, ArrayGeometry, ArrayUpdate, PhasedArray};
use ipab_core::config::SimulatorConfig;
use ipab_core::types::{CoreError, CoreResult};
use num_complex::Complex64;
use serde::Serialize;

use crate::presets::Preset;
use crate::scenario::{builtin_scenarios, slugify, ScenarioTemplate};
use crate::state::{QuickSave, SimulatorState, STATE_VERSION};

/// Short description of the current array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySummary {
    pub id: u32,
    pub name: String,
    pub num_elements: usize,
    pub geometry: ArrayGeometry,
    pub frequency: f64,
}

/// Simulator counters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatorStatus {
    pub total_arrays: usize,
    pub current_array_index: usize,
    pub scenarios_count: usize,
    pub quick_saves_count: usize,
    pub current_array: Option<ArraySummary>,
}

/// Collection of phased arrays with a current selection.
#[derive(Debug, Clone)]
pub struct Simulator {
    config: SimulatorConfig,
    arrays: Vec<PhasedArray>,
    current: usize,
    scenarios: BTreeMap<String, ScenarioTemplate>,
    quick_saves: VecDeque<QuickSave>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulator {
    /// One default array ("Array 1", id 0) plus the built-in scenarios.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        let mut sim = Self::empty_with_config(config);
        sim.arrays.push(PhasedArray::new(0, "Array 1"));
        sim
    }

    /// No arrays, built-in scenarios only.
    pub fn empty() -> Self {
        Self::empty_with_config(SimulatorConfig::default())
    }

    fn empty_with_config(config: SimulatorConfig) -> Self {
        Self {
            config,
            arrays: Vec::new(),
            current: 0,
            scenarios: builtin_scenarios(),
            quick_saves: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Array collection
    // -----------------------------------------------------------------------

    pub fn arrays(&self) -> &[PhasedArray] {
        &self.arrays
    }

    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_array(&self) -> Option<&PhasedArray> {
        self.arrays.get(self.current)
    }

    pub fn current_array_mut(&mut self) -> Option<&mut PhasedArray> {
        self.arrays.get_mut(self.current)
    }

    fn position_of(&self, id: u32) -> CoreResult<usize> {
        self.arrays
            .iter()
            .position(|a| a.id() == id)
            .ok_or_else(|| CoreError::NotLoaded(format!("array {}", id)))
    }

    pub fn array(&self, id: u32) -> CoreResult<&PhasedArray> {
        let index = self.position_of(id)?;
        Ok(&self.arrays[index])
    }

    pub fn array_mut(&mut self, id: u32) -> CoreResult<&mut PhasedArray> {
        let index = self.position_of(id)?;
        Ok(&mut self.arrays[index])
    }

    pub fn set_current_array(&mut self, id: u32) -> CoreResult<()> {
        self.current = self.position_of(id)?;
        Ok(())
    }

    fn next_id(&self) -> u32 {
        self.arrays
            .iter()
            .map(|a| a.id())
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    fn push_current(&mut self, array: PhasedArray) -> u32 {
        let id = array.id();
        self.arrays.push(array);
        self.current = self.arrays.len() - 1;
        id
    }

    /// Add an array and make it current. Returns the assigned id.
    ///
    /// Without a configuration the new array is a default one named
    /// "Array N". A supplied configuration keeps its name; its id is always
    /// replaced by a fresh one.
    pub fn add_array(&mut self, config: Option<ArrayConfig>) -> CoreResult<u32> {
        let id = self.next_id();
        let array = match config {
            Some(mut config) => {
                config.id = id;
                PhasedArray::try_from(config)?
            }
            None => PhasedArray::new(id, format!("Array {}", id + 1)),
        };

        tracing::info!(id, name = array.name(), "Added array");
        Ok(self.push_current(array))
    }

    /// Whether removing an array would keep at least one in the collection
    pub fn can_remove_array(&self) -> bool {
        self.arrays.len() > 1
    }

    /// Remove an array by id.
    ///
    /// Removing the last array is allowed here and leaves an empty simulator;
    /// callers that need at least one array check [`Self::can_remove_array`].
    pub fn remove_array(&mut self, id: u32) -> CoreResult<PhasedArray> {
        let index = self.position_of(id)?;
        let removed = self.arrays.remove(index);

        if index < self.current {
            self.current -= 1;
        }
        if self.current >= self.arrays.len() {
            self.current = self.arrays.len().saturating_sub(1);
        }

        tracing::info!(id, remaining = self.arrays.len(), "Removed array");
        Ok(removed)
    }

    /// Replace the current array with a default one, keeping id and name.
    pub fn reset_current_array(&mut self) -> CoreResult<()> {
        let current = self
            .current_array_mut()
            .ok_or_else(|| CoreError::NotLoaded("current array".to_string()))?;
        *current = PhasedArray::new(current.id(), current.name().to_string());
        Ok(())
    }

    pub fn update_current_array(&mut self, update: &ArrayUpdate) -> CoreResult<()> {
        self.current_array_mut()
            .ok_or_else(|| CoreError::NotLoaded("current array".to_string()))?
            .apply_update(update)
    }

    pub fn apply_preset(&mut self, preset: Preset) -> CoreResult<()> {
        tracing::debug!(%preset, "Applying preset");
        self.update_current_array(&preset.update())
    }

    /// Apply a preset by name, e.g. `"endfire"`.
    pub fn apply_preset_str(&mut self, name: &str) -> CoreResult<()> {
        self.apply_preset(name.parse()?)
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------

    pub fn scenarios(&self) -> &BTreeMap<String, ScenarioTemplate> {
        &self.scenarios
    }

    pub fn scenario(&self, id: &str) -> Option<&ScenarioTemplate> {
        self.scenarios.get(id)
    }

    /// Instantiate a scenario as a new current array. Returns its id.
    pub fn load_scenario(&mut self, scenario_id: &str) -> CoreResult<u32> {
        let template = self
            .scenarios
            .get(scenario_id)
            .ok_or_else(|| CoreError::NotLoaded(format!("scenario '{}'", scenario_id)))?;
        let array = template.instantiate(self.next_id())?;

        tracing::info!(scenario = scenario_id, id = array.id(), name = array.name(), "Loaded scenario");
        Ok(self.push_current(array))
    }

    /// Store the current array as a scenario. Returns the scenario id.
    pub fn save_scenario(&mut self, name: &str, description: &str) -> CoreResult<String> {
        let slug = slugify(name)?;
        let current = self
            .current_array()
            .ok_or_else(|| CoreError::NotLoaded("current array".to_string()))?;

        let mut template = ScenarioTemplate::from_array(current, description);
        template.config.name = name.trim().to_string();

        tracing::info!(scenario = %slug, "Saved scenario");
        self.scenarios.insert(slug.clone(), template);
        Ok(slug)
    }

    // -----------------------------------------------------------------------
    // Quick saves
    // -----------------------------------------------------------------------

    pub fn quick_saves(&self) -> impl Iterator<Item = &QuickSave> {
        self.quick_saves.iter()
    }

    /// Snapshot the current array, keeping only the newest saves. Returns the
    /// number of stored saves.
    pub fn quick_save(&mut self, name: &str) -> CoreResult<usize> {
        let current = self
            .current_array()
            .ok_or_else(|| CoreError::NotLoaded("current array".to_string()))?;

        let name = if name.trim().is_empty() {
            format!("Quick Save {}", self.quick_saves.len() + 1)
        } else {
            name.to_string()
        };
        let save = QuickSave {
            name,
            array: current.to_config(),
            array_index: self.current,
            arrays_count: self.arrays.len(),
        };

        self.quick_saves.push_back(save);
        while self.quick_saves.len() > self.config.max_quick_saves {
            self.quick_saves.pop_front();
        }
        Ok(self.quick_saves.len())
    }

    /// Replace the collection with the array stored in a quick save.
    pub fn quick_load(&mut self, index: usize) -> CoreResult<&PhasedArray> {
        let save = self
            .quick_saves
            .get(index)
            .ok_or_else(|| CoreError::NotLoaded(format!("quick save {}", index)))?;
        let array = PhasedArray::try_from(save.array.clone())?;

        tracing::info!(index, name = %save.name, "Loaded quick save");
        self.arrays = vec![array];
        self.current = 0;
        Ok(&self.arrays[0])
    }

    // -----------------------------------------------------------------------
    // Combined fields
    // -----------------------------------------------------------------------

    /// Sum of every array's near field at a point
    pub fn combined_field(&self, x: f64, y: f64) -> Complex64 {
        self.arrays.iter().map(|a| a.near_field(x, y)).sum()
    }

    /// Average of every array's far-field pattern
    pub fn combined_pattern(&self, angles: &[f64]) -> Vec<f64> {
        let mut combined = vec![0.0; angles.len()];
        if self.arrays.is_empty() {
            return combined;
        }
        for array in &self.arrays {
            for (acc, p) in combined.iter_mut().zip(array.far_field(angles)) {
                *acc += p;
            }
        }
        let n = self.arrays.len() as f64;
        combined.iter_mut().for_each(|v| *v /= n);
        combined
    }

    pub fn status(&self) -> SimulatorStatus {
        SimulatorStatus {
            total_arrays: self.arrays.len(),
            current_array_index: self.current,
            scenarios_count: self.scenarios.len(),
            quick_saves_count: self.quick_saves.len(),
            current_array: self.current_array().map(|a| ArraySummary {
                id: a.id(),
                name: a.name().to_string(),
                num_elements: a.num_elements(),
                geometry: a.geometry(),
                frequency: a.frequency(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Export / import
    // -----------------------------------------------------------------------

    pub fn export_state(&self) -> SimulatorState {
        SimulatorState {
            version: STATE_VERSION.to_string(),
            arrays: self.arrays.iter().map(PhasedArray::to_config).collect(),
            current_array_index: self.current,
        }
    }

    pub fn export_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(&self.export_state())?)
    }

    /// Replace all arrays from a typed state document. On error the live
    /// state is unchanged.
    pub fn import_state(&mut self, state: &SimulatorState) -> CoreResult<()> {
        let arrays = state
            .arrays
            .iter()
            .cloned()
            .map(PhasedArray::try_from)
            .collect::<CoreResult<Vec<_>>>()?;
        self.install(arrays, state.current_array_index)
    }

    /// Replace all arrays from a JSON state document. On error the live state
    /// is unchanged.
    pub fn import_json(&mut self, json: &str) -> CoreResult<()> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value.as_object().ok_or_else(|| {
            CoreError::MalformedConfiguration("state document must be an object".to_string())
        })?;

        let arrays = match object.get("arrays") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Array(items)) => items
                .iter()
                .map(PhasedArray::from_value)
                .collect::<CoreResult<Vec<_>>>()?,
            Some(_) => {
                return Err(CoreError::MalformedConfiguration(
                    "'arrays' must be a list".to_string(),
                ))
            }
        };

        let index = match object.get("current_array_index") {
            None | Some(serde_json::Value::Null) => 0,
            Some(v) => v.as_u64().ok_or_else(|| {
                CoreError::MalformedConfiguration(format!("invalid current_array_index: {}", v))
            })? as usize,
        };

        self.install(arrays, index)
    }

    fn install(&mut self, arrays: Vec<PhasedArray>, index: usize) -> CoreResult<()> {
        if !arrays.is_empty() && index >= arrays.len() {
            return Err(CoreError::MalformedConfiguration(format!(
                "current_array_index {} out of range for {} arrays",
                index,
                arrays.len()
            )));
        }
        if arrays.is_empty() && index != 0 {
            return Err(CoreError::MalformedConfiguration(format!(
                "current_array_index {} given for an empty collection",
                index
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = arrays.iter().map(PhasedArray::id).find(|id| !seen.insert(*id)) {
            return Err(CoreError::MalformedConfiguration(format!(
                "duplicate array id {}",
                dup
            )));
        }

        tracing::info!(arrays = arrays.len(), current = index, "Imported simulator state");
        self.arrays = arrays;
        self.current = index;
        Ok(())
    }

    /// Rebuild a simulator from an exported document, falling back to
    /// [`Simulator::new`] when the document is malformed.
    pub fn restore_or_default(json: &str) -> Self {
        let mut sim = Self::new();
        if let Err(e) = sim.import_json(json) {
            tracing::warn!(error = %e, "Discarding malformed simulator state");
        }
        sim
    }
}
