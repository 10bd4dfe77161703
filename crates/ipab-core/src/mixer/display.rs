//! Conversion of floating-point grids to 8-bit display data.

use image::GrayImage;
use ndarray::Array2;

use super::spectrum::ComponentKind;

/// Clip to [0, 255] and truncate to `u8`. NaN maps to 0.
pub fn clip_to_u8(values: &Array2<f64>) -> Array2<u8> {
    values.mapv(|v| if v.is_nan() { 0 } else { v.clamp(0.0, 255.0) as u8 })
}

/// Min-max normalize to [0, 255]. A flat grid maps to all zeros.
pub fn normalize_to_u8(values: &Array2<f64>) -> Array2<u8> {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    let range = max - min;
    if !range.is_finite() || range <= 0.0 {
        return Array2::zeros(values.dim());
    }

    values.mapv(|v| {
        if v.is_finite() {
            (((v - min) / range) * 255.0).clamp(0.0, 255.0) as u8
        } else {
            0
        }
    })
}

/// Display transform for a spectral component.
///
/// Magnitude spans many decades, so it is compressed with `ln(1 + v)` before
/// normalization. Other components are normalized directly.
pub fn component_to_u8(kind: ComponentKind, values: &Array2<f64>) -> Array2<u8> {
    match kind {
        ComponentKind::Magnitude => normalize_to_u8(&values.mapv(f64::ln_1p)),
        ComponentKind::Phase | ComponentKind::Real | ComponentKind::Imaginary => {
            normalize_to_u8(values)
        }
    }
}

/// Hand a `[row, col]` grid to the `image` crate for encoding.
pub fn to_gray_image(pixels: &Array2<u8>) -> GrayImage {
    let (rows, cols) = pixels.dim();
    GrayImage::from_fn(cols as u32, rows as u32, |x, y| {
        image::Luma([pixels[[y as usize, x as usize]]])
    })
}
