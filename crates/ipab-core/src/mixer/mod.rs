//! Spectral Mixer: Fourier-Domain Image Compositing
//!
//! Mixes up to four grayscale images by blending frequency-domain components
//! under a rectangular spatial-frequency mask, then inverts back to the
//! spatial domain.
//!
//! ## Pipeline
//!
//! ```text
//! load ─► grayscale ─► SpatialImage ─► Spectrum (cached, from original)
//!                                          │
//!   MixRequest ─► components ─► × mask ─► × weight ─► Σ ─► reconstruct
//!                                                            │
//!                                     clip [0,255] ◄─ |·| ◄─ IFFT(ifftshift)
//! ```
//!
//! Brightness/contrast adjustments only touch the *current* copy of an image.
//! Component extraction and mixing always derive from the untouched
//! original, so mixing output is independent of display adjustments.
//!
//! ## Example
//!
//! ```rust
//! use ipab_core::mixer::{ImageSlot, MixMode, MixRequest, SpectralMixer};
//! use ndarray::Array2;
//!
//! let mut mixer = SpectralMixer::new();
//! let img = Array2::from_shape_fn((8, 8), |(r, c)| ((r * 8 + c) * 3) as f64);
//! mixer.load_array(ImageSlot::Img1, img).unwrap();
//!
//! let request = MixRequest::new()
//!     .with_weights(ImageSlot::Img1, 1.0, 1.0)
//!     .with_mode(ImageSlot::Img1, MixMode::MagnitudePhase);
//! let output = mixer.mix(&request).unwrap().unwrap();
//! assert_eq!(output.dim(), (8, 8));
//! ```

pub mod adjust;
pub mod display;
pub mod spatial;
pub mod mask;
pub mod spectrum;
pub mod viewer;

pub use adjust::{AdjustReference, AdjustedImage, Adjustment};
pub use spatial::SpatialImage;
pub use mask::{Region, RegionMask, RegionPolarity};
pub use spectrum::{ComponentKind, MixMode, Spectrum};
pub use viewer::{MixRequest, SpectralMixer};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::CoreError;

/// Identifier of an image slot in the mixer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImageSlot {
    #[serde(rename = "img1")]
    Img1,
    #[serde(rename = "img2")]
    Img2,
    #[serde(rename = "img3")]
    Img3,
    #[serde(rename = "img4")]
    Img4,
}

impl ImageSlot {
    /// All slots in order
    pub const ALL: [ImageSlot; 4] = [
        ImageSlot::Img1,
        ImageSlot::Img2,
        ImageSlot::Img3,
        ImageSlot::Img4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSlot::Img1 => "img1",
            ImageSlot::Img2 => "img2",
            ImageSlot::Img3 => "img3",
            ImageSlot::Img4 => "img4",
        }
    }
}

impl fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSlot {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSlot::ALL
            .iter()
            .copied()
            .find(|slot| slot.as_str() == s)
            .ok_or_else(|| CoreError::invalid_enum("image slot", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_parse() {
        assert_eq!("img3".parse::<ImageSlot>().unwrap(), ImageSlot::Img3);
        assert!(matches!(
            "img5".parse::<ImageSlot>(),
            Err(CoreError::InvalidEnumValue { kind: "image slot", .. })
        ));
    }

    #[test]
    fn test_slot_serde() {
        let json = serde_json::to_string(&ImageSlot::Img2).unwrap();
        assert_eq!(json, "\"img2\"");
        let back: ImageSlot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ImageSlot::Img2);
    }
}
