//! Brightness / contrast adjustment of the displayed image copy.
//!
//! `out = clip((in · b − 127.5) · c + 127.5, 0, 255)`
//!
//! With [`AdjustReference::Original`] the input is the untouched original and
//! `(b, c)` are applied directly. With [`AdjustReference::Current`] the input
//! is the current copy and only the ratio against the previously applied
//! multipliers is applied, so repeated slider moves do not compound.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::CoreError;

/// Valid brightness multiplier range
pub const BRIGHTNESS_RANGE: (f64, f64) = (0.0, 2.0);
/// Valid contrast multiplier range
pub const CONTRAST_RANGE: (f64, f64) = (0.0, 3.0);

const MID_GRAY: f64 = 127.5;

/// Which copy an adjustment starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustReference {
    #[default]
    Original,
    Current,
}

impl AdjustReference {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustReference::Original => "original",
            AdjustReference::Current => "current",
        }
    }
}

impl fmt::Display for AdjustReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustReference {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(AdjustReference::Original),
            "current" => Ok(AdjustReference::Current),
            _ => Err(CoreError::InvalidReferenceMode(s.to_string())),
        }
    }
}

/// A brightness/contrast multiplier pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self::identity()
    }
}

impl Adjustment {
    /// 1.0 / 1.0
    pub fn identity() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
        }
    }

    /// Clamp into the valid ranges. NaN falls back to the identity value.
    pub fn clamped(brightness: f64, contrast: f64) -> Self {
        let clamp = |v: f64, (lo, hi): (f64, f64)| if v.is_nan() { 1.0 } else { v.clamp(lo, hi) };
        Self {
            brightness: clamp(brightness, BRIGHTNESS_RANGE),
            contrast: clamp(contrast, CONTRAST_RANGE),
        }
    }

    /// Effective multipliers to apply on top of `last`. A zero baseline
    /// cannot be divided out, so the target is applied directly.
    pub fn relative_to(&self, last: Adjustment) -> Adjustment {
        let ratio = |target: f64, prev: f64| if prev != 0.0 { target / prev } else { target };
        Adjustment {
            brightness: ratio(self.brightness, last.brightness),
            contrast: ratio(self.contrast, last.contrast),
        }
    }

    /// Apply to a grid, clipping to [0, 255].
    pub fn apply(&self, pixels: &Array2<f64>) -> Array2<f64> {
        let (b, c) = (self.brightness, self.contrast);
        pixels.mapv(|v| ((v * b - MID_GRAY) * c + MID_GRAY).clamp(0.0, 255.0))
    }
}

/// Result of a brightness/contrast request.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedImage {
    /// The new current copy, already clipped
    pub image: Array2<f64>,
    /// `(height, width)`
    pub dims: (usize, usize),
    /// Applied (clamped) brightness
    pub brightness: f64,
    /// Applied (clamped) contrast
    pub contrast: f64,
}

/// Compute the adjusted copy for `target`, given the original, the current
/// copy and the previous baseline.
pub fn adjust(
    original: &Array2<f64>,
    current: &Array2<f64>,
    last: Adjustment,
    target: Adjustment,
    reference: AdjustReference,
) -> Array2<f64> {
    match reference {
        AdjustReference::Original => target.apply(original),
        AdjustReference::Current => target.relative_to(last).apply(current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> Array2<f64> {
        Array2::from_shape_fn((4, 4), |(r, c)| (r * 64 + c * 16) as f64)
    }

    #[test]
    fn test_identity_is_noop() {
        let img = gradient();
        let out = Adjustment::identity().apply(&img);
        for (a, b) in img.iter().zip(out.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_clamping() {
        let adj = Adjustment::clamped(5.0, -1.0);
        assert_eq!(adj.brightness, 2.0);
        assert_eq!(adj.contrast, 0.0);

        let adj = Adjustment::clamped(f64::NAN, 2.5);
        assert_eq!(adj.brightness, 1.0);
        assert_eq!(adj.contrast, 2.5);
    }

    #[test]
    fn test_zero_contrast_is_mid_gray() {
        let out = Adjustment::clamped(1.3, 0.0).apply(&gradient());
        assert!(out.iter().all(|&v| (v - 127.5).abs() < 1e-12));
    }

    #[test]
    fn test_output_clipped() {
        let out = Adjustment::clamped(2.0, 3.0).apply(&gradient());
        assert!(out.iter().all(|&v| (0.0..=255.0).contains(&v)));
        assert_eq!(out[[3, 3]], 255.0);
        assert_eq!(out[[0, 0]], 0.0);
    }

    #[test]
    fn test_relative_ratio() {
        let last = Adjustment { brightness: 0.5, contrast: 2.0 };
        let target = Adjustment { brightness: 1.0, contrast: 1.0 };
        let rel = target.relative_to(last);
        assert!((rel.brightness - 2.0).abs() < 1e-12);
        assert!((rel.contrast - 0.5).abs() < 1e-12);

        let zero = Adjustment { brightness: 0.0, contrast: 0.0 };
        let rel = target.relative_to(zero);
        assert_eq!(rel, target);
    }

    #[test]
    fn test_current_mode_uses_current_copy() {
        let original = gradient();
        let current = Array2::from_elem((4, 4), 100.0);
        let last = Adjustment::identity();
        let out = adjust(&original, &current, last, Adjustment::identity(), AdjustReference::Current);
        assert_eq!(out, current);

        let out = adjust(&original, &current, last, Adjustment::identity(), AdjustReference::Original);
        assert_eq!(out, original);
    }

    #[test]
    fn test_reference_parse() {
        assert_eq!("current".parse::<AdjustReference>().unwrap(), AdjustReference::Current);
        assert!(matches!(
            "latest".parse::<AdjustReference>(),
            Err(CoreError::InvalidReferenceMode(ref s)) if s == "latest"
        ));
    }
}
