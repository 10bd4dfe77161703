//! Rectangular frequency-region masks
//!
//! A [`Region`] is a normalized rectangle over the centre-shifted spectrum
//! plus a polarity. The full-spectrum inner region is the identity mask and
//! is the default, so every mix goes through the same masking step.
//!
//! ```text
//!   inner                outer
//!  ┌──────────┐        ┌──────────┐
//!  │ 0  0  0  │        │ 1  1  1  │
//!  │ 0 [1] 0  │        │ 1 [0] 1  │
//!  │ 0  0  0  │        │ 1  1  1  │
//!  └──────────┘        └──────────┘
//! ```

use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::types::CoreError;

/// Which side of the rectangle is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionPolarity {
    /// Keep only frequencies inside the rectangle
    #[default]
    Inner,
    /// Keep only frequencies outside the rectangle
    Outer,
}

impl FromStr for RegionPolarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inner" => Ok(RegionPolarity::Inner),
            "outer" => Ok(RegionPolarity::Outer),
            _ => Err(CoreError::invalid_enum("region type", s)),
        }
    }
}

/// Normalized rectangle (top-left corner plus size, each in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(rename = "type")]
    pub polarity: RegionPolarity,
}

impl Default for Region {
    fn default() -> Self {
        Self::full_spectrum()
    }
}

impl Region {
    /// The identity mask
    pub fn full_spectrum() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            polarity: RegionPolarity::Inner,
        }
    }

    pub fn new(x: f64, y: f64, width: f64, height: f64, polarity: RegionPolarity) -> Self {
        Self {
            x,
            y,
            width,
            height,
            polarity,
        }
    }

    /// Centred rectangle covering `fraction` of each axis.
    pub fn centered(fraction: f64, polarity: RegionPolarity) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        let offset = (1.0 - fraction) / 2.0;
        Self::new(offset, offset, fraction, fraction, polarity)
    }

    /// Same rectangle, opposite polarity
    pub fn inverted(&self) -> Self {
        let polarity = match self.polarity {
            RegionPolarity::Inner => RegionPolarity::Outer,
            RegionPolarity::Outer => RegionPolarity::Inner,
        };
        Self { polarity, ..*self }
    }

    /// Pixel bounds `(y0, y1, x0, x1)` as half-open ranges on a `rows × cols`
    /// grid. The footprint is never smaller than one pixel.
    pub fn pixel_bounds(&self, rows: usize, cols: usize) -> (usize, usize, usize, usize) {
        let (x0, x1) = axis_bounds(self.x, self.width, cols);
        let (y0, y1) = axis_bounds(self.y, self.height, rows);
        (y0, y1, x0, x1)
    }
}

fn axis_bounds(start: f64, extent: f64, len: usize) -> (usize, usize) {
    let to_px = |v: f64| -> i64 {
        if v.is_finite() {
            (v * len as f64).floor() as i64
        } else {
            0
        }
    };

    let len_i = len as i64;
    let mut lo = to_px(start).clamp(0, len_i);
    let mut hi = lo.saturating_add(to_px(extent).max(0)).clamp(0, len_i);

    if hi <= lo {
        hi = lo + 1;
    }
    if hi > len_i {
        hi = len_i;
        lo = (hi - 1).max(0);
    }

    (lo as usize, hi as usize)
}

/// Binary mask materialized over a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionMask {
    mask: Array2<f64>,
}

impl RegionMask {
    /// Build the mask for `region` over a `(rows, cols)` grid.
    pub fn build(region: &Region, dim: (usize, usize)) -> Self {
        let (rows, cols) = dim;
        if rows == 0 || cols == 0 {
            return Self {
                mask: Array2::zeros(dim),
            };
        }

        let (y0, y1, x0, x1) = region.pixel_bounds(rows, cols);
        let (fill, rect) = match region.polarity {
            RegionPolarity::Inner => (0.0, 1.0),
            RegionPolarity::Outer => (1.0, 0.0),
        };

        let mut mask = Array2::from_elem(dim, fill);
        mask.slice_mut(s![y0..y1, x0..x1]).fill(rect);
        Self { mask }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.mask.dim()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.mask
    }

    /// Number of pixels passed by the mask
    pub fn count_passed(&self) -> usize {
        self.mask.iter().filter(|&&v| v > 0.5).count()
    }

    /// Element-wise product with a component of the same shape
    pub fn apply(&self, component: &Array2<f64>) -> Array2<f64> {
        component * &self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_spectrum_is_identity() {
        let mask = RegionMask::build(&Region::full_spectrum(), (7, 9));
        assert!(mask.as_array().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_inner_outer_complement() {
        let regions = [
            Region::new(0.25, 0.25, 0.5, 0.5, RegionPolarity::Inner),
            Region::new(0.1, 0.6, 0.3, 0.9, RegionPolarity::Inner),
            Region::new(0.99, 0.99, 0.0, 0.0, RegionPolarity::Inner),
            Region::new(0.0, 0.0, 1.0, 1.0, RegionPolarity::Inner),
            Region::new(1.0, 1.0, 0.5, 0.5, RegionPolarity::Inner),
        ];

        for region in &regions {
            let inner = RegionMask::build(region, (10, 13));
            let outer = RegionMask::build(&region.inverted(), (10, 13));
            for (a, b) in inner.as_array().iter().zip(outer.as_array().iter()) {
                assert_eq!(a + b, 1.0, "region {:?}", region);
            }
        }
    }

    #[test]
    fn test_degenerate_region_is_one_pixel() {
        let region = Region::new(0.5, 0.5, 0.0, 0.0, RegionPolarity::Inner);
        let mask = RegionMask::build(&region, (8, 8));
        assert_eq!(mask.count_passed(), 1);
        assert_eq!(mask.as_array()[[4, 4]], 1.0);

        // Anchored at the far edge it still stays inside the grid
        let edge = Region::new(1.0, 1.0, 0.0, 0.0, RegionPolarity::Inner);
        let mask = RegionMask::build(&edge, (8, 8));
        assert_eq!(mask.count_passed(), 1);
        assert_eq!(mask.as_array()[[7, 7]], 1.0);
    }

    #[test]
    fn test_pixel_bounds() {
        let region = Region::new(0.25, 0.5, 0.5, 0.25, RegionPolarity::Inner);
        assert_eq!(region.pixel_bounds(8, 16), (4, 6, 4, 12));
    }

    #[test]
    fn test_centered_region() {
        let region = Region::centered(0.5, RegionPolarity::Outer);
        assert_eq!(region.x, 0.25);
        let mask = RegionMask::build(&region, (4, 4));
        assert_eq!(mask.count_passed(), 12);
    }

    #[test]
    fn test_huge_extent_saturates() {
        let region: Region = serde_json::from_str(
            r#"{"x": 0.5, "y": 0.5, "width": 1e300, "height": 1.0, "type": "inner"}"#,
        )
        .unwrap();
        assert_eq!(region.pixel_bounds(8, 8), (4, 8, 4, 8));

        let mask = RegionMask::build(&region, (8, 8));
        assert_eq!(mask.count_passed(), 16);
    }

    #[test]
    fn test_region_serde_defaults() {
        let region: Region = serde_json::from_str(r#"{"type": "outer"}"#).unwrap();
        assert_eq!(region.polarity, RegionPolarity::Outer);
        assert_eq!(region.width, 1.0);

        let region: Region = serde_json::from_str(r#"{"x": 0.2, "width": 0.3}"#).unwrap();
        assert_eq!(region.x, 0.2);
        assert_eq!(region.height, 1.0);
        assert_eq!(region.polarity, RegionPolarity::Inner);
    }
}
