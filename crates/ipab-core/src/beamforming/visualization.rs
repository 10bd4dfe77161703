//! Plot-ready data shaped from a [`PhasedArray`].
//!
//! These are plain serializable structs; rendering belongs to the caller.

use serde::{Deserialize, Serialize};

use super::array::PhasedArray;
use super::pattern::{linspace, DEFAULT_MIN_DISTANCE};
use crate::config::BeamformingConfig;

/// Offset added before taking `log10` of a pattern
const DB_EPSILON: f64 = 1e-10;

/// Normalized polar pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolarData {
    pub angles: Vec<f64>,
    /// Array factor divided by the active element count
    pub pattern: Vec<f64>,
    pub pattern_db: Vec<f64>,
    pub max_db: f64,
    pub min_db: f64,
}

/// Field intensity map, rows follow y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapData {
    /// `log1p(100·h)` min-max scaled to [0, 1]
    pub data: Vec<Vec<f64>>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    /// Extremes of the log-compressed map before scaling
    pub max_value: f64,
    pub min_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementMarker {
    pub index: usize,
    pub x: f64,
    pub y: f64,
    pub phase: f64,
    pub amplitude: f64,
    pub is_active: bool,
}

/// Element layout plus array placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayLayout {
    pub elements: Vec<ElementMarker>,
    pub array_position: [f64; 2],
    pub array_rotation: f64,
    pub beam_direction: f64,
}

/// Phase and amplitude of the active elements, for line charts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseAmplitudeSeries {
    pub indices: Vec<usize>,
    pub phases: Vec<f64>,
    pub amplitudes: Vec<f64>,
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 0.0)
    }
}

impl PhasedArray {
    pub fn polar_data(&self, num_points: usize) -> PolarData {
        let angles = linspace(-180.0, 180.0, num_points);
        let active = self.active_count();
        let pattern: Vec<f64> = if active == 0 {
            vec![0.0; angles.len()]
        } else {
            self.far_field(&angles)
                .into_iter()
                .map(|p| p / active as f64)
                .collect()
        };
        let pattern_db: Vec<f64> = pattern.iter().map(|p| 20.0 * (p + DB_EPSILON).log10()).collect();
        let (min_db, max_db) = min_max(pattern_db.iter().copied());

        PolarData {
            angles,
            pattern,
            pattern_db,
            max_db,
            min_db,
        }
    }

    pub fn heatmap_data(&self, x_range: (f64, f64), y_range: (f64, f64), resolution: usize) -> HeatmapData {
        self.heatmap_data_with(x_range, y_range, resolution, DEFAULT_MIN_DISTANCE)
    }

    /// Polar and heatmap data using the configured sampling.
    pub fn plot_data(&self, config: &BeamformingConfig) -> (PolarData, HeatmapData) {
        let polar = self.polar_data(config.polar_points);
        let heatmap = self.heatmap_data_with(
            config.heatmap_x_range,
            config.heatmap_y_range,
            config.heatmap_resolution,
            config.min_distance,
        );
        (polar, heatmap)
    }

    fn heatmap_data_with(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
        resolution: usize,
        min_distance: f64,
    ) -> HeatmapData {
        let raw = self.heatmap_with(x_range, y_range, resolution, min_distance);
        let peak = raw.iter().copied().fold(0.0, f64::max);
        let compressed = if peak > 0.0 {
            raw.mapv(|h| (100.0 * h / peak).ln_1p())
        } else {
            raw.mapv(|_| 0.0)
        };

        let (min_value, max_value) = min_max(compressed.iter().copied());
        let span = max_value - min_value;
        let data: Vec<Vec<f64>> = compressed
            .rows()
            .into_iter()
            .map(|row| {
                row.iter()
                    .map(|&v| if span > 0.0 { (v - min_value) / span } else { 0.0 })
                    .collect::<Vec<f64>>()
            })
            .collect();

        HeatmapData {
            data,
            x_range,
            y_range,
            max_value,
            min_value,
        }
    }

    pub fn array_layout(&self) -> ArrayLayout {
        ArrayLayout {
            elements: self
                .elements()
                .iter()
                .map(|e| ElementMarker {
                    index: e.index,
                    x: e.x(),
                    y: e.y(),
                    phase: e.phase,
                    amplitude: e.amplitude,
                    is_active: e.is_active,
                })
                .collect(),
            array_position: self.position(),
            array_rotation: self.rotation(),
            beam_direction: self.steering_angle(),
        }
    }

    pub fn phase_amplitude_series(&self) -> PhaseAmplitudeSeries {
        let mut series = PhaseAmplitudeSeries::default();
        for e in self.elements().iter().filter(|e| e.is_active) {
            series.indices.push(e.index);
            series.phases.push(e.phase);
            series.amplitudes.push(e.amplitude);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polar_normalized() {
        let polar = PhasedArray::default().polar_data(361);
        assert_eq!(polar.angles.len(), 361);
        assert!((polar.pattern[180] - 1.0).abs() < 1e-9);
        assert!(polar.max_db.abs() < 1e-6);
        assert!(polar.min_db < -10.0);
    }

    #[test]
    fn test_polar_no_active_elements() {
        let mut array = PhasedArray::default();
        for e in array.elements_mut() {
            e.is_active = false;
        }
        let polar = array.polar_data(9);
        assert!(polar.pattern.iter().all(|&p| p == 0.0));
        assert!((polar.max_db + 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_heatmap_data_scaled() {
        let data = PhasedArray::default().heatmap_data((-5.0, 5.0), (-5.0, 5.0), 21);
        assert_eq!(data.data.len(), 21);
        assert_eq!(data.data[0].len(), 21);
        let flat: Vec<f64> = data.data.iter().flatten().copied().collect();
        let max = flat.iter().copied().fold(f64::MIN, f64::max);
        let min = flat.iter().copied().fold(f64::MAX, f64::min);
        assert!((max - 1.0).abs() < 1e-12);
        assert!(min.abs() < 1e-12);
        assert!((data.max_value - 101f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_heatmap_data_flat() {
        let mut array = PhasedArray::default();
        for e in array.elements_mut() {
            e.amplitude = 0.0;
        }
        let data = array.heatmap_data((-1.0, 1.0), (-1.0, 1.0), 4);
        assert!(data.data.iter().flatten().all(|&v| v == 0.0));
    }

    #[test]
    fn test_plot_data_uses_config() {
        let config = BeamformingConfig {
            polar_points: 73,
            heatmap_resolution: 12,
            heatmap_x_range: (-2.0, 2.0),
            heatmap_y_range: (0.0, 4.0),
            ..BeamformingConfig::default()
        };
        let (polar, heatmap) = PhasedArray::default().plot_data(&config);
        assert_eq!(polar.angles.len(), 73);
        assert_eq!(heatmap.data.len(), 12);
        assert_eq!(heatmap.y_range, (0.0, 4.0));
    }

    #[test]
    fn test_layout_and_series() {
        let mut array = PhasedArray::default();
        array.set_steering_angle(15.0);
        array.elements_mut()[0].is_active = false;

        let layout = array.array_layout();
        assert_eq!(layout.elements.len(), 8);
        assert_eq!(layout.beam_direction, 15.0);
        assert!(!layout.elements[0].is_active);

        let series = array.phase_amplitude_series();
        assert_eq!(series.indices, (1..8).collect::<Vec<_>>());
        assert_eq!(series.amplitudes.len(), 7);
    }
}
