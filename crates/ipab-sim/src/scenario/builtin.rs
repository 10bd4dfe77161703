//! Scenarios shipped with the simulator.

use std::collections::BTreeMap;

use ipab_core::beamforming::{ArrayConfig, ArrayGeometry, PhaseProfile};

use super::template::ScenarioTemplate;

/// Speed of sound in soft tissue, m/s
pub const SPEED_OF_SOUND_TISSUE: f64 = 1540.0;

const SPEED_OF_LIGHT: f64 = 3.0e8;

/// 64-element λ/2 linear array at 3.5 GHz steered to 30°
pub fn five_g() -> ScenarioTemplate {
    let frequency = 3.5e9;
    ScenarioTemplate::new(
        "64-element linear array for 5G beamforming at 3.5 GHz",
        ArrayConfig {
            name: "5G Beam Steering".to_string(),
            geometry: ArrayGeometry::Linear,
            num_elements: 64,
            element_spacing: 0.5 * SPEED_OF_LIGHT / frequency,
            frequency,
            propagation_speed: SPEED_OF_LIGHT,
            steering_angle: 30.0,
            phase_profile: PhaseProfile::Linear,
            ..ArrayConfig::default()
        },
    )
}

/// 128-element curved probe at 5 MHz focused 10 cm deep
pub fn ultrasound() -> ScenarioTemplate {
    let frequency = 5.0e6;
    let wavelength = SPEED_OF_SOUND_TISSUE / frequency;
    ScenarioTemplate::new(
        "128-element curved array for medical ultrasound imaging",
        ArrayConfig {
            name: "Ultrasound Imaging".to_string(),
            geometry: ArrayGeometry::Curved,
            num_elements: 128,
            element_spacing: 0.25 * wavelength,
            // y = 10·x² approximates a 5 cm convex radius
            curvature: 10.0,
            frequency,
            propagation_speed: SPEED_OF_SOUND_TISSUE,
            focus_distance: 0.1,
            phase_profile: PhaseProfile::Quadratic,
            ..ArrayConfig::default()
        },
    )
}

/// 256-element ring at 1 MHz focused 5 cm out (HIFU)
pub fn ablation() -> ScenarioTemplate {
    let frequency = 1.0e6;
    let wavelength = SPEED_OF_SOUND_TISSUE / frequency;
    ScenarioTemplate::new(
        "256-element array for high-intensity focused ultrasound",
        ArrayConfig {
            name: "Tumor Ablation".to_string(),
            geometry: ArrayGeometry::Circular,
            num_elements: 256,
            element_spacing: 0.2 * wavelength,
            frequency,
            propagation_speed: SPEED_OF_SOUND_TISSUE,
            focus_distance: 0.05,
            phase_profile: PhaseProfile::Quadratic,
            ..ArrayConfig::default()
        },
    )
}

/// All built-in templates keyed by scenario id
pub fn builtin_scenarios() -> BTreeMap<String, ScenarioTemplate> {
    BTreeMap::from([
        ("5g".to_string(), five_g()),
        ("ultrasound".to_string(), ultrasound()),
        ("ablation".to_string(), ablation()),
    ])
}
