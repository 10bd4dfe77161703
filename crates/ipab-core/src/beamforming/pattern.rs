//! Far-field array factor and near-field superposition.
//!
//! ## Far field
//!
//! ```text
//! AF(θ) = | Σ aₙ · exp(i·(kₙ·(xₙ sin θ + yₙ cos θ) + φₙ)) |
//! ```
//!
//! ## Near field
//!
//! ```text
//! E(x, y) = Σ aₙ / √max(dₙ, d_min) · exp(i·(kₙ·dₙ + φₙ))
//! ```
//!
//! Sums run over active elements only. No normalization is applied.

use ndarray::Array2;
use num_complex::Complex64;

use super::array::PhasedArray;
use super::geometry;

/// Default near-field distance floor in metres
pub const DEFAULT_MIN_DISTANCE: f64 = 1e-6;

/// Heatmap grids are clamped to this many points per axis
pub const MAX_HEATMAP_RESOLUTION: usize = 2048;

/// `n` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Per-element constants hoisted out of the evaluation loops.
struct Radiator {
    x: f64,
    y: f64,
    amplitude: f64,
    k: f64,
    phase: f64,
}

fn radiators(array: &PhasedArray) -> Vec<Radiator> {
    let (f, c) = (array.frequency(), array.propagation_speed());
    array
        .elements()
        .iter()
        .filter(|e| e.is_active)
        .map(|e| Radiator {
            x: e.x(),
            y: e.y(),
            amplitude: e.amplitude,
            k: e.wavenumber(f, c),
            phase: e.phase.to_radians(),
        })
        .collect()
}

fn field_at(radiators: &[Radiator], x: f64, y: f64, min_distance: f64) -> Complex64 {
    radiators
        .iter()
        .map(|r| {
            let d = (x - r.x).hypot(y - r.y).max(min_distance);
            Complex64::from_polar(r.amplitude / d.sqrt(), r.k * d + r.phase)
        })
        .sum()
}

impl PhasedArray {
    /// Array factor magnitude at each angle (degrees).
    pub fn far_field(&self, angles: &[f64]) -> Vec<f64> {
        let radiators = radiators(self);
        angles
            .iter()
            .map(|&theta| {
                let [ux, uy] = geometry::direction(theta);
                radiators
                    .iter()
                    .map(|r| Complex64::from_polar(r.amplitude, r.k * (r.x * ux + r.y * uy) + r.phase))
                    .sum::<Complex64>()
                    .norm()
            })
            .collect()
    }

    /// Complex field at a point, with the default distance floor.
    pub fn near_field(&self, x: f64, y: f64) -> Complex64 {
        self.near_field_with(x, y, DEFAULT_MIN_DISTANCE)
    }

    pub fn near_field_with(&self, x: f64, y: f64, min_distance: f64) -> Complex64 {
        field_at(&radiators(self), x, y, min_distance)
    }

    /// `|E|` over a `resolution × resolution` grid. Row index follows y,
    /// column index follows x.
    pub fn heatmap(&self, x_range: (f64, f64), y_range: (f64, f64), resolution: usize) -> Array2<f64> {
        self.heatmap_with(x_range, y_range, resolution, DEFAULT_MIN_DISTANCE)
    }

    pub fn heatmap_with(
        &self,
        x_range: (f64, f64),
        y_range: (f64, f64),
        resolution: usize,
        min_distance: f64,
    ) -> Array2<f64> {
        let resolution = if resolution > MAX_HEATMAP_RESOLUTION {
            tracing::warn!(resolution, max = MAX_HEATMAP_RESOLUTION, "Clamping heatmap resolution");
            MAX_HEATMAP_RESOLUTION
        } else {
            resolution
        };
        let radiators = radiators(self);
        let xs = linspace(x_range.0, x_range.1, resolution);
        let ys = linspace(y_range.0, y_range.1, resolution);

        tracing::trace!(id = self.id(), resolution, elements = radiators.len(), "Computing heatmap");

        Array2::from_shape_fn((ys.len(), xs.len()), |(row, col)| {
            field_at(&radiators, xs[col], ys[row], min_distance).norm()
        })
    }
}
