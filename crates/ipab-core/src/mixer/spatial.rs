//! Spatial images with an attached transform cache.

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageBuffer, Luma};
use ndarray::Array2;

use super::adjust::Adjustment;
use super::spectrum::{ComponentKind, Spectrum};
use crate::config::ResampleFilter;
use crate::types::{CoreError, CoreResult};

/// One loaded image: immutable original, display copy, and the transform
/// of the original.
///
/// The spectrum is private and only ever rebuilt from the original, so the
/// cache cannot drift out of sync with the pixels it was computed from.
#[derive(Debug, Clone)]
pub struct SpatialImage {
    original: Array2<f64>,
    current: Array2<f64>,
    last_adjustment: Adjustment,
    spectrum: Option<Spectrum>,
}

impl SpatialImage {
    /// Wrap a grayscale grid. Fails on empty grids or non-finite samples.
    pub fn new(pixels: Array2<f64>) -> CoreResult<Self> {
        let (rows, cols) = pixels.dim();
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                rows, cols
            )));
        }
        if pixels.iter().any(|v| !v.is_finite()) {
            return Err(CoreError::InvalidImage(
                "image contains non-finite samples".to_string(),
            ));
        }

        let mut image = Self {
            current: pixels.clone(),
            original: pixels,
            last_adjustment: Adjustment::identity(),
            spectrum: None,
        };
        image.recompute_spectrum();
        Ok(image)
    }

    /// Forced single-channel conversion of a decoded image.
    pub fn from_dynamic(img: &DynamicImage) -> CoreResult<Self> {
        let gray = img.to_luma8();
        let (width, height) = gray.dimensions();
        let pixels = Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
            gray.get_pixel(c as u32, r as u32).0[0] as f64
        });
        Self::new(pixels)
    }

    /// Decode encoded bytes (PNG, JPEG, BMP) into a grayscale image.
    pub fn decode(bytes: &[u8]) -> CoreResult<Self> {
        let img = image::load_from_memory(bytes)
            .map_err(|e| CoreError::InvalidImage(e.to_string()))?;
        Self::from_dynamic(&img)
    }

    /// Shape as `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.original.dim()
    }

    pub fn original(&self) -> &Array2<f64> {
        &self.original
    }

    pub fn current(&self) -> &Array2<f64> {
        &self.current
    }

    pub fn last_adjustment(&self) -> Adjustment {
        self.last_adjustment
    }

    pub fn spectrum(&self) -> Option<&Spectrum> {
        self.spectrum.as_ref()
    }

    /// One cached component, or `NotComputed` if the cache is missing.
    pub fn component(&self, kind: ComponentKind, name: &str) -> CoreResult<&Array2<f64>> {
        self.spectrum
            .as_ref()
            .map(|s| s.component(kind))
            .ok_or_else(|| CoreError::NotComputed(name.to_string()))
    }

    /// Store a display adjustment. The original and spectrum are untouched.
    pub(crate) fn set_current(&mut self, adjusted: Array2<f64>, applied: Adjustment) {
        self.current = adjusted;
        self.last_adjustment = applied;
    }

    /// Resample both copies to `(height, width)` and rebuild the spectrum.
    /// No-op when already at that size.
    pub fn resize(&mut self, height: usize, width: usize, filter: ResampleFilter) {
        if self.dim() == (height, width) {
            return;
        }

        tracing::debug!(
            from = ?self.dim(),
            to = ?(height, width),
            ?filter,
            "Resampling image"
        );

        self.original = resample(&self.original, height, width, filter);
        self.current = resample(&self.current, height, width, filter);
        self.recompute_spectrum();
    }

    fn recompute_spectrum(&mut self) {
        self.spectrum = Some(Spectrum::compute(&self.original));
    }
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Resample an intensity grid in [0, 255] using the `image` crate's filters.
///
/// Works in `f32` luma scaled to [0, 1] so no precision is lost to an 8-bit
/// round trip.
pub fn resample(
    pixels: &Array2<f64>,
    height: usize,
    width: usize,
    filter: ResampleFilter,
) -> Array2<f64> {
    let (rows, cols) = pixels.dim();
    let raw: Vec<f32> = pixels
        .iter()
        .map(|&v| (v.clamp(0.0, 255.0) / 255.0) as f32)
        .collect();

    let Some(buffer) = ImageBuffer::<Luma<f32>, Vec<f32>>::from_raw(cols as u32, rows as u32, raw)
    else {
        return Array2::zeros((height, width));
    };

    let resized = imageops::resize(&buffer, width as u32, height as u32, filter_type(filter));

    Array2::from_shape_fn((height, width), |(r, c)| {
        (resized.get_pixel(c as u32, r as u32).0[0] as f64 * 255.0).clamp(0.0, 255.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn encode_png(img: &DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
        bytes
    }

    #[test]
    fn test_new_rejects_empty_and_nan() {
        assert!(matches!(
            SpatialImage::new(Array2::zeros((0, 4))),
            Err(CoreError::InvalidImage(_))
        ));

        let mut px = Array2::zeros((2, 2));
        px[[1, 1]] = f64::NAN;
        assert!(matches!(SpatialImage::new(px), Err(CoreError::InvalidImage(_))));
    }

    #[test]
    fn test_spectrum_cached_on_load() {
        let img = SpatialImage::new(Array2::from_elem((4, 4), 5.0)).unwrap();
        let mag = img.component(ComponentKind::Magnitude, "img1").unwrap();
        assert!((mag[[2, 2]] - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_dynamic_grayscale() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(2, 1, Luma([200]));
        let img = SpatialImage::from_dynamic(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(img.dim(), (2, 3));
        assert_eq!(img.original()[[1, 2]], 200.0);
        assert_eq!(img.original()[[0, 0]], 0.0);
    }

    #[test]
    fn test_decode_png_to_grayscale() {
        let mut rgb = RgbImage::new(4, 3);
        rgb.put_pixel(3, 2, Rgb([255, 255, 255]));
        rgb.put_pixel(1, 0, Rgb([90, 90, 90]));
        let bytes = encode_png(&DynamicImage::ImageRgb8(rgb));

        let img = SpatialImage::decode(&bytes).unwrap();
        assert_eq!(img.dim(), (3, 4));
        assert_eq!(img.original()[[2, 3]], 255.0);
        assert_eq!(img.original()[[0, 1]], 90.0);
        assert_eq!(img.original()[[0, 0]], 0.0);
        assert_eq!(img.current(), img.original());
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            SpatialImage::decode(b"definitely not a png"),
            Err(CoreError::InvalidImage(_))
        ));
    }

    #[test]
    fn test_resize_rebuilds_spectrum() {
        let mut img = SpatialImage::new(Array2::from_elem((8, 6), 100.0)).unwrap();
        img.resize(4, 3, ResampleFilter::Lanczos3);
        assert_eq!(img.dim(), (4, 3));
        assert_eq!(img.current().dim(), (4, 3));
        assert_eq!(img.spectrum().unwrap().dim(), (4, 3));

        // A flat field stays flat under resampling
        for &v in img.original().iter() {
            assert!((v - 100.0).abs() < 0.5, "got {}", v);
        }
    }

    #[test]
    fn test_resize_same_size_is_noop() {
        let px = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as f64);
        let mut img = SpatialImage::new(px.clone()).unwrap();
        img.resize(4, 4, ResampleFilter::Lanczos3);
        assert_eq!(img.original(), &px);
    }
}
