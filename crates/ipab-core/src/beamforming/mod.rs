//! Phased-Array Beamforming Engine
//!
//! Element geometry, per-element phase excitation, far-field array factor and
//! near-field superposition for 2-D arrays of isotropic radiators.
//!
//! ## Conventions
//!
//! - SI units: Hz, metres, m/s. `λ = c / f`, `k = 2π·f / c`.
//! - Element phases are stored in degrees and kept in (−180, 180].
//! - Pattern angles are degrees measured from +y toward +x, so the direction
//!   of angle θ is `(sin θ, cos θ)` and 0° is broadside of an unrotated array.
//! - Array rotation is counter-clockwise.
//!
//! ```text
//!  geometry ─► elements ─► phases ─┬─► far_field ─► metrics / polar data
//!                                  └─► near_field ─► heatmap
//! ```
//!
//! ## Example
//!
//! ```rust
//! use ipab_core::beamforming::{PhasedArray, PhaseProfile};
//!
//! let mut array = PhasedArray::default(); // 8 elements, λ/2 spacing
//! array.set_steering_angle(20.0);
//! array.compute_phases();
//!
//! let metrics = array.beam_metrics();
//! assert_eq!(metrics.main_lobe_angle, 20.0);
//! assert_eq!(array.phase_profile(), PhaseProfile::Linear);
//! ```

pub mod array;
pub mod element;
pub mod geometry;
pub mod metrics;
pub mod pattern;
pub mod visualization;

pub use array::{
    wrap_phase, ArrayConfig, ArrayUpdate, ElementOverride, PhaseProfile, PhasedArray, MAX_ELEMENTS,
};
pub use element::ArrayElement;
pub use geometry::ArrayGeometry;
pub use metrics::BeamMetrics;
pub use pattern::{linspace, MAX_HEATMAP_RESOLUTION};
pub use visualization::{ArrayLayout, ElementMarker, HeatmapData, PhaseAmplitudeSeries, PolarData};
