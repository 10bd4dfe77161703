//! A single radiating element.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One element of a phased array. Positions are global (already rotated and
/// translated), in metres; phase is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrayElement {
    pub index: usize,
    pub position: [f64; 2],
    pub phase: f64,
    pub amplitude: f64,
    /// Per-element carrier override in Hz
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    pub is_active: bool,
}

impl Default for ArrayElement {
    fn default() -> Self {
        Self::new(0, [0.0, 0.0])
    }
}

impl ArrayElement {
    pub fn new(index: usize, position: [f64; 2]) -> Self {
        Self {
            index,
            position,
            phase: 0.0,
            amplitude: 1.0,
            frequency: None,
            is_active: true,
        }
    }

    pub fn x(&self) -> f64 {
        self.position[0]
    }

    pub fn y(&self) -> f64 {
        self.position[1]
    }

    /// Carrier used by this element. Non-positive overrides are ignored.
    pub fn effective_frequency(&self, base: f64) -> f64 {
        match self.frequency {
            Some(f) if f.is_finite() && f > 0.0 => f,
            _ => base,
        }
    }

    pub fn wavelength(&self, base_frequency: f64, propagation_speed: f64) -> f64 {
        propagation_speed / self.effective_frequency(base_frequency)
    }

    /// `k = 2π·f/c` in rad/m
    pub fn wavenumber(&self, base_frequency: f64, propagation_speed: f64) -> f64 {
        2.0 * PI * self.effective_frequency(base_frequency) / propagation_speed
    }

    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (x - self.position[0]).hypot(y - self.position[1])
    }
}
