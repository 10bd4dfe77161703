//! Scalar beam-quality metrics from an angular sweep.

use serde::{Deserialize, Serialize};

use super::array::PhasedArray;
use super::pattern::linspace;
use crate::config::BeamformingConfig;

/// Floor for dB quantities that would otherwise be −∞
pub const DB_FLOOR: f64 = -100.0;

/// Relative tolerance for treating two pattern samples as the same peak
const PEAK_TIE_TOLERANCE: f64 = 1e-9;

/// Beam-quality summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamMetrics {
    /// Main lobe direction in degrees
    pub main_lobe_angle: f64,
    /// −3 dB beamwidth in degrees
    pub beamwidth: f64,
    /// Highest sidelobe relative to the main lobe, dB
    pub sidelobe_level: f64,
    /// Peak-to-average power, dB
    pub directivity: f64,
    /// Pattern maximum
    pub max_intensity: f64,
}

/// Index of the main lobe.
///
/// Samples within [`PEAK_TIE_TOLERANCE`] of the maximum count as ties; the
/// one closest to 0° wins, then the lowest index.
fn main_lobe_index(angles: &[f64], pattern: &[f64]) -> usize {
    let peak = pattern.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = peak - peak.abs() * PEAK_TIE_TOLERANCE;

    pattern
        .iter()
        .enumerate()
        .filter(|(_, &p)| p >= threshold)
        .min_by(|(i, _), (j, _)| angles[*i].abs().total_cmp(&angles[*j].abs()).then(i.cmp(j)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Compute metrics from a sampled pattern. `angles` and `pattern` must have
/// equal length; `exclusion` is the half-width in samples of the window
/// around the main lobe skipped when searching for sidelobes.
pub fn compute(angles: &[f64], pattern: &[f64], exclusion: usize) -> BeamMetrics {
    let n = pattern.len().min(angles.len());
    if n == 0 {
        return BeamMetrics {
            main_lobe_angle: 0.0,
            beamwidth: 0.0,
            sidelobe_level: DB_FLOOR,
            directivity: 0.0,
            max_intensity: 0.0,
        };
    }
    let (angles, pattern) = (&angles[..n], &pattern[..n]);

    let main = main_lobe_index(angles, pattern);
    let main_value = pattern[main];
    let main_power = main_value * main_value;
    let half_power = main_power / 2.0;

    let mut left = main;
    while left > 0 && pattern[left].powi(2) > half_power {
        left -= 1;
    }
    let mut right = main;
    while right < n - 1 && pattern[right].powi(2) > half_power {
        right += 1;
    }
    let beamwidth = angles[right] - angles[left];

    let lo = main.saturating_sub(exclusion);
    let hi = (main + exclusion + 1).min(n);
    let sidelobe = pattern[..lo]
        .iter()
        .chain(pattern[hi..].iter())
        .copied()
        .fold(0.0_f64, f64::max);
    let sidelobe_level = if main_value > 0.0 && sidelobe > 0.0 {
        (20.0 * (sidelobe / main_value).log10()).max(DB_FLOOR)
    } else {
        DB_FLOOR
    };

    let mean_power = pattern.iter().map(|p| p * p).sum::<f64>() / n as f64;
    let directivity = if mean_power > 0.0 {
        10.0 * (main_power / mean_power).log10()
    } else {
        0.0
    };

    BeamMetrics {
        main_lobe_angle: angles[main],
        beamwidth,
        sidelobe_level,
        directivity,
        max_intensity: pattern.iter().copied().fold(0.0, f64::max),
    }
}

impl PhasedArray {
    /// Metrics over the default 361-point sweep.
    pub fn beam_metrics(&self) -> BeamMetrics {
        self.beam_metrics_with(&BeamformingConfig::default())
    }

    pub fn beam_metrics_with(&self, config: &BeamformingConfig) -> BeamMetrics {
        let angles = linspace(-180.0, 180.0, config.sweep_points);
        let pattern = self.far_field(&angles);
        let metrics = compute(&angles, &pattern, config.sidelobe_exclusion);
        tracing::debug!(id = self.id(), ?metrics, "Computed beam metrics");
        metrics
    }
}
