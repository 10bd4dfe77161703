//! Element placement for the supported array geometries.
//!
//! Local positions are generated centred on the origin with the array's
//! broadside along +y, then rotated counter-clockwise by the array rotation
//! and translated by the array position.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::types::CoreError;

/// Array geometry kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayGeometry {
    /// Evenly spaced along x, centred on zero
    #[default]
    Linear,
    /// Linear x-spacing with a parabolic offset `y = curvature · x²`
    Curved,
    /// Evenly around a circle whose circumference is `n · spacing`
    Circular,
    /// Near-square row-major grid
    Rectangular,
}

impl ArrayGeometry {
    pub const ALL: [ArrayGeometry; 4] = [
        ArrayGeometry::Linear,
        ArrayGeometry::Curved,
        ArrayGeometry::Circular,
        ArrayGeometry::Rectangular,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayGeometry::Linear => "linear",
            ArrayGeometry::Curved => "curved",
            ArrayGeometry::Circular => "circular",
            ArrayGeometry::Rectangular => "rectangular",
        }
    }
}

impl fmt::Display for ArrayGeometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArrayGeometry {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArrayGeometry::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| CoreError::invalid_enum("geometry", s))
    }
}

// ---------------------------------------------------------------------------
// Local layouts
// ---------------------------------------------------------------------------

/// Grid shape `(rows, cols)` used by the rectangular layout.
///
/// `rows = floor(sqrt(n))`, `cols = ceil(n / rows)`, so `rows · cols >= n`
/// and every element lands on the grid.
pub fn rectangular_grid(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let rows = ((n as f64).sqrt().floor() as usize).max(1);
    let cols = n.div_ceil(rows);
    (rows, cols)
}

/// Centred offset of index `i` along an axis of `n` points.
#[inline]
fn centred(i: usize, n: usize) -> f64 {
    i as f64 - (n as f64 - 1.0) / 2.0
}

/// Element positions before rotation and translation.
pub fn local_positions(
    geometry: ArrayGeometry,
    n: usize,
    spacing: f64,
    curvature: f64,
) -> Vec<[f64; 2]> {
    match geometry {
        ArrayGeometry::Linear => (0..n).map(|i| [centred(i, n) * spacing, 0.0]).collect(),
        ArrayGeometry::Curved => (0..n)
            .map(|i| {
                let x = centred(i, n) * spacing;
                [x, curvature * x * x]
            })
            .collect(),
        ArrayGeometry::Circular => {
            let radius = n as f64 * spacing / (2.0 * PI);
            (0..n)
                .map(|i| {
                    let a = 2.0 * PI * i as f64 / n as f64;
                    [radius * a.sin(), radius * a.cos()]
                })
                .collect()
        }
        ArrayGeometry::Rectangular => {
            let (rows, cols) = rectangular_grid(n);
            (0..n)
                .map(|i| {
                    let (row, col) = (i / cols, i % cols);
                    [centred(col, cols) * spacing, centred(row, rows) * spacing]
                })
                .collect()
        }
    }
}

/// Rotate counter-clockwise by `rotation_deg` and translate by `origin`.
pub fn place(local: [f64; 2], rotation_deg: f64, origin: [f64; 2]) -> [f64; 2] {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let [x, y] = local;
    [x * cos - y * sin + origin[0], x * sin + y * cos + origin[1]]
}

/// Unit vector of a pattern angle: measured from +y toward +x.
#[inline]
pub fn direction(angle_deg: f64) -> [f64; 2] {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    [sin, cos]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_symmetric() {
        let pos = local_positions(ArrayGeometry::Linear, 8, 0.5, 1.0);
        assert_eq!(pos.len(), 8);
        assert!((pos[0][0] + 1.75).abs() < 1e-12);
        for i in 0..4 {
            assert!((pos[i][0] + pos[7 - i][0]).abs() < 1e-12);
            assert_eq!(pos[i][1], 0.0);
        }
    }

    #[test]
    fn test_curved_parabola() {
        let pos = local_positions(ArrayGeometry::Curved, 5, 1.0, 0.5);
        // x = -2..2, y = 0.5 x²
        assert!((pos[0][1] - 2.0).abs() < 1e-12);
        assert!(pos[2][1].abs() < 1e-12);
        assert!((pos[4][1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_circular_spacing() {
        let n = 16;
        let d = 0.25;
        let pos = local_positions(ArrayGeometry::Circular, n, d, 1.0);
        let radius = n as f64 * d / (2.0 * PI);
        for p in &pos {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - radius).abs() < 1e-12);
        }
        // Arc length between neighbours equals the spacing
        let chord = ((pos[1][0] - pos[0][0]).powi(2) + (pos[1][1] - pos[0][1]).powi(2)).sqrt();
        let arc = 2.0 * radius * (chord / (2.0 * radius)).asin();
        assert!((arc - d).abs() < 1e-9);
    }

    #[test]
    fn test_rectangular_grid() {
        assert_eq!(rectangular_grid(16), (4, 4));
        assert_eq!(rectangular_grid(8), (2, 4));
        assert_eq!(rectangular_grid(10), (3, 4));
        assert_eq!(rectangular_grid(1), (1, 1));

        let pos = local_positions(ArrayGeometry::Rectangular, 10, 1.0, 1.0);
        assert_eq!(pos.len(), 10);
        // Every y lies on one of the three rows
        for p in &pos {
            assert!([-1.0, 0.0, 1.0].iter().any(|r| (p[1] - r).abs() < 1e-12));
        }
    }

    #[test]
    fn test_count_every_geometry() {
        for geometry in ArrayGeometry::ALL {
            for n in [1, 2, 7, 12, 64] {
                assert_eq!(local_positions(geometry, n, 0.5, 1.0).len(), n, "{} n={}", geometry, n);
            }
        }
    }

    #[test]
    fn test_place_rotation() {
        let p = place([1.0, 0.0], 90.0, [2.0, 3.0]);
        assert!((p[0] - 2.0).abs() < 1e-12);
        assert!((p[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_convention() {
        let d = direction(90.0);
        assert!((d[0] - 1.0).abs() < 1e-12 && d[1].abs() < 1e-12);
        let d = direction(0.0);
        assert!(d[0].abs() < 1e-12 && (d[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse() {
        assert_eq!("circular".parse::<ArrayGeometry>().unwrap(), ArrayGeometry::Circular);
        assert!(matches!(
            "hexagonal".parse::<ArrayGeometry>(),
            Err(CoreError::InvalidEnumValue { kind: "geometry", .. })
        ));
    }
}
