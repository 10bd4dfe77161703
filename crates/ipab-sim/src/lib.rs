//! # IPAB Simulator
//!
//! Session layer on top of [`ipab_core::beamforming`]: a collection of
//! phased arrays with a current selection, a scenario library, bounded
//! quick saves and whole-state export/import.
//!
//! ## Example
//!
//! ```rust
//! use ipab_sim::{Preset, Simulator};
//!
//! let mut sim = Simulator::new();
//! let id = sim.load_scenario("5g").unwrap();
//! sim.apply_preset(Preset::Broadside).unwrap();
//!
//! let json = sim.export_json().unwrap();
//! let restored = Simulator::restore_or_default(&json);
//! assert_eq!(restored.array(id).unwrap().steering_angle(), 0.0);
//! ```

pub mod presets;
pub mod scenario;
pub mod simulator;
pub mod state;

pub use presets::Preset;
pub use scenario::{builtin_scenarios, slugify, ScenarioTemplate};
pub use simulator::{ArraySummary, Simulator, SimulatorStatus};
pub use state::{QuickSave, SimulatorState, STATE_VERSION};
