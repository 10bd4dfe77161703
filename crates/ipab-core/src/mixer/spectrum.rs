//! Frequency transform of a spatial image and its component views.

use ndarray::{Array2, Zip};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::fft_utils::{fft_shift, ifft_shift, Fft2d};
use crate::types::CoreError;

/// A real-valued view of a centre-shifted transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// `|F|`, non-negative
    Magnitude,
    /// `arg F`, radians
    Phase,
    /// `Re F`
    Real,
    /// `Im F`
    Imaginary,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Magnitude => "magnitude",
            ComponentKind::Phase => "phase",
            ComponentKind::Real => "real",
            ComponentKind::Imaginary => "imaginary",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magnitude" => Ok(ComponentKind::Magnitude),
            "phase" => Ok(ComponentKind::Phase),
            "real" => Ok(ComponentKind::Real),
            "imaginary" => Ok(ComponentKind::Imaginary),
            _ => Err(CoreError::invalid_enum("component", s)),
        }
    }
}

/// Which component pair an image contributes to a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixMode {
    /// Component A = magnitude, component B = phase
    #[default]
    MagnitudePhase,
    /// Component A = real, component B = imaginary
    RealImaginary,
}

impl MixMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MixMode::MagnitudePhase => "magnitude_phase",
            MixMode::RealImaginary => "real_imaginary",
        }
    }

    /// The `(A, B)` component kinds for this mode
    pub fn components(&self) -> (ComponentKind, ComponentKind) {
        match self {
            MixMode::MagnitudePhase => (ComponentKind::Magnitude, ComponentKind::Phase),
            MixMode::RealImaginary => (ComponentKind::Real, ComponentKind::Imaginary),
        }
    }

    /// Rebuild a complex transform from two accumulated components.
    ///
    /// - magnitude_phase: `a · exp(i·b)`
    /// - real_imaginary: `a + i·b`
    pub fn reconstruct(&self, a: &Array2<f64>, b: &Array2<f64>) -> Array2<Complex64> {
        let mut out = Array2::from_elem(a.dim(), Complex64::new(0.0, 0.0));
        match self {
            MixMode::MagnitudePhase => {
                Zip::from(&mut out)
                    .and(a)
                    .and(b)
                    .for_each(|o, &m, &p| *o = Complex64::from_polar(m, p));
            }
            MixMode::RealImaginary => {
                Zip::from(&mut out)
                    .and(a)
                    .and(b)
                    .for_each(|o, &re, &im| *o = Complex64::new(re, im));
            }
        }
        out
    }
}

impl fmt::Display for MixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MixMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "magnitude_phase" => Ok(MixMode::MagnitudePhase),
            "real_imaginary" => Ok(MixMode::RealImaginary),
            _ => Err(CoreError::invalid_enum("mix mode", s)),
        }
    }
}

/// Centre-shifted 2-D DFT with its four derived views.
#[derive(Debug, Clone)]
pub struct Spectrum {
    shifted: Array2<Complex64>,
    magnitude: Array2<f64>,
    phase: Array2<f64>,
    real: Array2<f64>,
    imaginary: Array2<f64>,
}

impl Spectrum {
    /// Transform a spatial image and extract all views in one pass.
    pub fn compute(image: &Array2<f64>) -> Self {
        let (rows, cols) = image.dim();
        let fft = Fft2d::new(rows, cols);
        let shifted = fft_shift(&fft.forward_real(image));
        Self::from_shifted(shifted)
    }

    /// Wrap an already-shifted transform.
    pub fn from_shifted(shifted: Array2<Complex64>) -> Self {
        Self {
            magnitude: shifted.mapv(|v| v.norm()),
            phase: shifted.mapv(|v| v.arg()),
            real: shifted.mapv(|v| v.re),
            imaginary: shifted.mapv(|v| v.im),
            shifted,
        }
    }

    /// Grid shape as `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        self.shifted.dim()
    }

    /// The centre-shifted complex transform
    pub fn shifted(&self) -> &Array2<Complex64> {
        &self.shifted
    }

    /// One real-valued view
    pub fn component(&self, kind: ComponentKind) -> &Array2<f64> {
        match kind {
            ComponentKind::Magnitude => &self.magnitude,
            ComponentKind::Phase => &self.phase,
            ComponentKind::Real => &self.real,
            ComponentKind::Imaginary => &self.imaginary,
        }
    }

    /// The `(A, B)` views selected by a mix mode
    pub fn pair(&self, mode: MixMode) -> (&Array2<f64>, &Array2<f64>) {
        let (a, b) = mode.components();
        (self.component(a), self.component(b))
    }
}

/// Invert a centre-shifted transform back to a spatial magnitude image.
///
/// Takes `|ifft2(ifftshift(F))|`; the imaginary residue left by numerical
/// error (or by an asymmetric mix) is folded into the magnitude.
pub fn to_spatial(shifted: &Array2<Complex64>) -> Array2<f64> {
    let (rows, cols) = shifted.dim();
    let fft = Fft2d::new(rows, cols);
    let mut unshifted = ifft_shift(shifted);
    fft.inverse_inplace(&mut unshifted);
    unshifted.mapv(|v| v.norm())
}
