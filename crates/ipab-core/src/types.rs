//! Core types shared by the spectral mixer and the beamforming engine
//!
//! Both engines report failures through a single [`CoreError`] so that a
//! calling layer (HTTP handler, CLI, notebook binding) can translate every
//! failure into a user-facing response with one `match`.
//!
//! ```text
//!   caller ──► SpectralMixer / PhasedArray / Simulator
//!                         │
//!                         └──► CoreResult<T> = Result<T, CoreError>
//! ```

use num_complex::Complex64;

/// Type alias for complex numbers using f64 precision
pub type Complex = Complex64;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in the mixer or the beamforming engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("'{0}' is not loaded")]
    NotLoaded(String),

    /// A derived cache was missing. Unreachable under correct sequencing.
    #[error("Transform not computed for '{0}'")]
    NotComputed(String),

    #[error("No weights provided")]
    NoWeights,

    #[error("No images loaded")]
    NoImages,

    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Invalid {kind} value: '{value}'")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("Invalid reference mode: '{0}'. Must be 'original' or 'current'")]
    InvalidReferenceMode(String),

    #[error("Malformed configuration: {0}")]
    MalformedConfiguration(String),
}

impl CoreError {
    /// Build an [`CoreError::InvalidEnumValue`] for the given enum kind.
    pub fn invalid_enum(kind: &'static str, value: impl Into<String>) -> Self {
        CoreError::InvalidEnumValue {
            kind,
            value: value.into(),
        }
    }

    /// True for conditions caused by caller input, false for internal defects.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, CoreError::NotComputed(_))
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::MalformedConfiguration(e.to_string())
    }
}
