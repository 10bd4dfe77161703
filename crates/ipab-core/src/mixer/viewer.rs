//! The mixer session object: loaded images plus the mix operation.

use image::DynamicImage;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::adjust::{self, AdjustReference, AdjustedImage, Adjustment};
use super::display;
use super::mask::{Region, RegionMask};
use super::spatial::SpatialImage;
use super::spectrum::{self, ComponentKind, MixMode, Spectrum};
use super::ImageSlot;
use crate::config::MixerConfig;
use crate::types::{CoreError, CoreResult};

/// One mix invocation.
///
/// Weight maps are iterated in slot order. A missing weight counts as 0.0 and
/// a missing mode as [`MixMode::MagnitudePhase`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MixRequest {
    pub modes: BTreeMap<ImageSlot, MixMode>,
    pub weights_a: BTreeMap<ImageSlot, f64>,
    pub weights_b: BTreeMap<ImageSlot, f64>,
    pub region: Region,
}

impl MixRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both component weights for a slot
    pub fn with_weights(mut self, slot: ImageSlot, a: f64, b: f64) -> Self {
        self.weights_a.insert(slot, a);
        self.weights_b.insert(slot, b);
        self
    }

    pub fn with_weight_a(mut self, slot: ImageSlot, a: f64) -> Self {
        self.weights_a.insert(slot, a);
        self
    }

    pub fn with_weight_b(mut self, slot: ImageSlot, b: f64) -> Self {
        self.weights_b.insert(slot, b);
        self
    }

    pub fn with_mode(mut self, slot: ImageSlot, mode: MixMode) -> Self {
        self.modes.insert(slot, mode);
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    pub fn mode(&self, slot: ImageSlot) -> MixMode {
        self.modes.get(&slot).copied().unwrap_or_default()
    }

    fn weights(&self, slot: ImageSlot) -> (f64, f64) {
        (
            self.weights_a.get(&slot).copied().unwrap_or(0.0),
            self.weights_b.get(&slot).copied().unwrap_or(0.0),
        )
    }
}

/// Fourier-domain image mixer holding up to four images.
#[derive(Debug, Clone, Default)]
pub struct SpectralMixer {
    config: MixerConfig,
    images: BTreeMap<ImageSlot, SpatialImage>,
}

impl SpectralMixer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MixerConfig) -> Self {
        Self {
            config,
            images: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &MixerConfig {
        &self.config
    }

    /// Load a decoded image into a slot, replacing whatever was there.
    pub fn load_image(&mut self, slot: ImageSlot, img: &DynamicImage) -> CoreResult<(usize, usize)> {
        self.insert(slot, SpatialImage::from_dynamic(img)?)
    }

    /// Decode and load encoded image bytes.
    pub fn load_bytes(&mut self, slot: ImageSlot, bytes: &[u8]) -> CoreResult<(usize, usize)> {
        let image = SpatialImage::decode(bytes).map_err(|e| {
            tracing::warn!(%slot, error = %e, "Rejected image upload");
            e
        })?;
        self.insert(slot, image)
    }

    /// Load a grayscale grid directly.
    pub fn load_array(&mut self, slot: ImageSlot, pixels: Array2<f64>) -> CoreResult<(usize, usize)> {
        self.insert(slot, SpatialImage::new(pixels)?)
    }

    fn insert(&mut self, slot: ImageSlot, image: SpatialImage) -> CoreResult<(usize, usize)> {
        let dim = image.dim();
        tracing::info!(%slot, height = dim.0, width = dim.1, "Loaded image");
        self.images.insert(slot, image);
        Ok(dim)
    }

    pub fn is_loaded(&self, slot: ImageSlot) -> bool {
        self.images.contains_key(&slot)
    }

    /// Loaded slots in slot order
    pub fn loaded_slots(&self) -> Vec<ImageSlot> {
        self.images.keys().copied().collect()
    }

    fn get(&self, slot: ImageSlot) -> CoreResult<&SpatialImage> {
        self.images
            .get(&slot)
            .ok_or_else(|| CoreError::NotLoaded(slot.to_string()))
    }

    pub fn image(&self, slot: ImageSlot) -> CoreResult<&SpatialImage> {
        self.get(slot)
    }

    pub fn original_image(&self, slot: ImageSlot) -> CoreResult<&Array2<f64>> {
        Ok(self.get(slot)?.original())
    }

    pub fn current_image(&self, slot: ImageSlot) -> CoreResult<&Array2<f64>> {
        Ok(self.get(slot)?.current())
    }

    /// Resize every loaded image to the smallest common `(height, width)`.
    pub fn unify_dimensions(&mut self) -> CoreResult<(usize, usize)> {
        let target = self
            .images
            .values()
            .map(SpatialImage::dim)
            .reduce(|(h, w), (ih, iw)| (h.min(ih), w.min(iw)))
            .ok_or(CoreError::NoImages)?;

        let filter = self.config.resample_filter;
        for image in self.images.values_mut() {
            image.resize(target.0, target.1, filter);
        }

        tracing::debug!(height = target.0, width = target.1, "Unified image dimensions");
        Ok(target)
    }

    /// A cached spectral component of a loaded image.
    pub fn component(&self, slot: ImageSlot, kind: ComponentKind) -> CoreResult<&Array2<f64>> {
        self.get(slot)?.component(kind, slot.as_str())
    }

    /// A spectral component scaled for display.
    pub fn component_display(&self, slot: ImageSlot, kind: ComponentKind) -> CoreResult<Array2<u8>> {
        let values = self.component(slot, kind)?;
        Ok(display::component_to_u8(kind, values))
    }

    /// Mix the requested images in the frequency domain.
    ///
    /// The reference image is the first loaded slot of `weights_a`. Returns
    /// `Ok(None)` when there is none, even if `weights_b` names loaded slots.
    pub fn mix(&self, request: &MixRequest) -> CoreResult<Option<Array2<u8>>> {
        if request.weights_a.is_empty() && request.weights_b.is_empty() {
            return Err(CoreError::NoWeights);
        }

        let reference = request
            .weights_a
            .keys()
            .copied()
            .find(|slot| self.is_loaded(*slot));

        let Some(reference) = reference else {
            tracing::warn!("Mix requested but no loaded image has a weight in weights_a");
            return Ok(None);
        };

        let dim = self.get(reference)?.dim();
        let mask = RegionMask::build(&request.region, dim);

        let mut acc_a = Array2::<f64>::zeros(dim);
        let mut acc_b = Array2::<f64>::zeros(dim);

        let mut slots: Vec<ImageSlot> = request
            .weights_a
            .keys()
            .chain(request.weights_b.keys())
            .copied()
            .collect();
        slots.sort();
        slots.dedup();

        let mut contributors = 0usize;
        for slot in slots {
            let Some(image) = self.images.get(&slot) else {
                continue;
            };
            let (wa, wb) = request.weights(slot);
            if wa == 0.0 && wb == 0.0 {
                continue;
            }
            if image.dim() != dim {
                return Err(CoreError::DimensionMismatch {
                    expected: dim,
                    actual: image.dim(),
                });
            }

            let spectrum = Spectrum::compute(image.original());
            let (a, b) = spectrum.pair(request.mode(slot));
            acc_a.scaled_add(wa, &mask.apply(a));
            acc_b.scaled_add(wb, &mask.apply(b));
            contributors += 1;
        }

        let mode = request.mode(reference);
        let combined = mode.reconstruct(&acc_a, &acc_b);
        let output = spectrum::to_spatial(&combined);

        tracing::debug!(
            %reference,
            %mode,
            contributors,
            masked = dim.0 * dim.1 - mask.count_passed(),
            "Mixed images"
        );

        Ok(Some(display::clip_to_u8(&output)))
    }

    /// Adjust the displayed copy of an image. The original and its transform
    /// are never modified.
    pub fn apply_brightness_contrast(
        &mut self,
        slot: ImageSlot,
        brightness: f64,
        contrast: f64,
        reference: AdjustReference,
    ) -> CoreResult<AdjustedImage> {
        let image = self
            .images
            .get_mut(&slot)
            .ok_or_else(|| CoreError::NotLoaded(slot.to_string()))?;

        let target = Adjustment::clamped(brightness, contrast);
        let adjusted = adjust::adjust(
            image.original(),
            image.current(),
            image.last_adjustment(),
            target,
            reference,
        );
        image.set_current(adjusted.clone(), target);

        tracing::debug!(%slot, %reference, brightness = target.brightness, contrast = target.contrast, "Adjusted image");

        Ok(AdjustedImage {
            dims: adjusted.dim(),
            image: adjusted,
            brightness: target.brightness,
            contrast: target.contrast,
        })
    }

    /// Same as [`Self::apply_brightness_contrast`] with a string reference mode.
    pub fn apply_brightness_contrast_str(
        &mut self,
        slot: ImageSlot,
        brightness: f64,
        contrast: f64,
        reference: &str,
    ) -> CoreResult<AdjustedImage> {
        let reference: AdjustReference = reference.parse()?;
        self.apply_brightness_contrast(slot, brightness, contrast, reference)
    }

    /// Drop every loaded image.
    pub fn clear(&mut self) {
        tracing::info!(count = self.images.len(), "Cleared mixer");
        self.images.clear();
    }
}
