//! # Image Processing & Beamforming Core
//!
//! Two independent numerical engines behind plain-data interfaces:
//!
//! - **Spectral Mixer** ([`mixer`]): composites up to four grayscale images by
//!   blending their frequency-domain components (magnitude/phase or
//!   real/imaginary) under a rectangular spatial-frequency mask, then inverts
//!   back to the spatial domain.
//! - **Beamforming Engine** ([`beamforming`]): generates phased-array element
//!   geometry, computes per-element phase excitations and evaluates far-field
//!   patterns, near-field superposition and beam-quality metrics.
//!
//! ## Signal Flow
//!
//! ```text
//! Mixer: image → gray → FFT2 → shift → components → × mask × weight → Σ → IFFT2 → |·| → u8
//! Beam:  geometry → elements → phases → array factor / near field → metrics / plots
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ipab_core::prelude::*;
//! use ndarray::Array2;
//!
//! // Mixer
//! let mut mixer = SpectralMixer::new();
//! mixer.load_array(ImageSlot::Img1, Array2::from_elem((4, 4), 128.0)).unwrap();
//! let out = mixer
//!     .mix(&MixRequest::new().with_weights(ImageSlot::Img1, 1.0, 1.0))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(out.dim(), (4, 4));
//!
//! // Beamforming
//! let array = PhasedArray::default();
//! assert_eq!(array.beam_metrics().main_lobe_angle, 0.0);
//! ```

pub mod beamforming;
pub mod config;
pub mod fft_utils;
pub mod mixer;
pub mod observe;
pub mod types;

pub use config::{ConfigError, IpabConfig};
pub use types::{Complex, CoreError, CoreResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::beamforming::{
        ArrayConfig, ArrayElement, ArrayGeometry, ArrayUpdate, BeamMetrics, ElementOverride,
        PhaseProfile, PhasedArray,
    };
    pub use crate::config::IpabConfig;
    pub use crate::mixer::{
        AdjustReference, ComponentKind, ImageSlot, MixMode, MixRequest, Region, RegionPolarity,
        SpectralMixer,
    };
    pub use crate::observe::{init_logging, LogConfig};
    pub use crate::types::{Complex, CoreError, CoreResult};
}
