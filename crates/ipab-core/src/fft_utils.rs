//! 2-D FFT Utilities for Spectral Image Processing
//!
//! A separable 2-D DFT built from `rustfft` 1-D plans: every row is
//! transformed, then every column. The inverse is normalized by `1/(H·W)` so
//! that `inverse(forward(x)) == x`.
//!
//! ## Centre Shifting
//!
//! Raw FFT output has the zero-frequency (DC) term at index `[0, 0]`.
//! [`fft_shift`] rolls both axes by half their length so DC moves to the grid
//! centre, which is the layout the frequency masks are drawn against.
//! [`ifft_shift`] is its exact inverse, including for odd sizes.
//!
//! ```text
//!   unshifted            shifted
//!  ┌────┬────┐         ┌────┬────┐
//!  │ DC │ A  │         │ D  │ C  │
//!  ├────┼────┤  ───►   ├────┼────┤
//!  │ B  │ C  │         │ A  │ DC │   (DC at [H/2, W/2])
//!  └────┴────┘         └────┴────┘
//! ```

use ndarray::Array2;
use rustfft::{num_complex::Complex64, Fft, FftDirection, FftPlanner};
use std::fmt;
use std::sync::Arc;

/// 2-D FFT processor for a fixed grid size
pub struct Fft2d {
    rows: usize,
    cols: usize,
    row_forward: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for Fft2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fft2d")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl Fft2d {
    /// Create a processor for `rows × cols` grids
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            rows,
            cols,
            row_forward: planner.plan_fft(cols, FftDirection::Forward),
            col_forward: planner.plan_fft(rows, FftDirection::Forward),
            row_inverse: planner.plan_fft(cols, FftDirection::Inverse),
            col_inverse: planner.plan_fft(rows, FftDirection::Inverse),
        }
    }

    /// Grid shape as `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Forward transform of a real-valued grid
    pub fn forward_real(&self, input: &Array2<f64>) -> Array2<Complex64> {
        let mut buffer = input.mapv(|v| Complex64::new(v, 0.0));
        self.forward_inplace(&mut buffer);
        buffer
    }

    /// Forward transform in place
    pub fn forward_inplace(&self, data: &mut Array2<Complex64>) {
        assert_eq!(data.dim(), (self.rows, self.cols));
        Self::separable(data, &self.row_forward, &self.col_forward);
    }

    /// Inverse transform in place, normalized by `1/(rows·cols)`
    pub fn inverse_inplace(&self, data: &mut Array2<Complex64>) {
        assert_eq!(data.dim(), (self.rows, self.cols));
        Self::separable(data, &self.row_inverse, &self.col_inverse);

        let scale = 1.0 / (self.rows * self.cols) as f64;
        data.mapv_inplace(|v| v * scale);
    }

    fn separable(data: &mut Array2<Complex64>, row_fft: &Arc<dyn Fft<f64>>, col_fft: &Arc<dyn Fft<f64>>) {
        let (rows, cols) = data.dim();

        let mut line = vec![Complex64::new(0.0, 0.0); cols];
        for mut row in data.rows_mut() {
            for (dst, src) in line.iter_mut().zip(row.iter()) {
                *dst = *src;
            }
            row_fft.process(&mut line);
            for (dst, src) in row.iter_mut().zip(line.iter()) {
                *dst = *src;
            }
        }

        let mut line = vec![Complex64::new(0.0, 0.0); rows];
        for mut col in data.columns_mut() {
            for (dst, src) in line.iter_mut().zip(col.iter()) {
                *dst = *src;
            }
            col_fft.process(&mut line);
            for (dst, src) in col.iter_mut().zip(line.iter()) {
                *dst = *src;
            }
        }
    }
}

/// Roll both axes: `out[(r + dr) % H, (c + dc) % W] = in[r, c]`
fn roll2<T: Clone>(input: &Array2<T>, dr: usize, dc: usize) -> Array2<T> {
    let (rows, cols) = input.dim();
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let src_r = (r + rows - dr % rows.max(1)) % rows.max(1);
        let src_c = (c + cols - dc % cols.max(1)) % cols.max(1);
        input[[src_r, src_c]].clone()
    })
}

/// Move the zero-frequency term to the grid centre
pub fn fft_shift<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    roll2(input, rows / 2, cols / 2)
}

/// Undo [`fft_shift`]
pub fn ifft_shift<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (rows, cols) = input.dim();
    roll2(input, rows - rows / 2, cols - cols / 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Array2<f64> {
        Array2::from_shape_fn((rows, cols), |(r, c)| (r * cols + c) as f64)
    }

    #[test]
    fn test_dc_term() {
        let img = Array2::from_elem((4, 6), 2.0);
        let fft = Fft2d::new(4, 6);
        let spectrum = fft.forward_real(&img);

        assert!((spectrum[[0, 0]].re - 48.0).abs() < 1e-9);
        for ((r, c), v) in spectrum.indexed_iter() {
            if (r, c) != (0, 0) {
                assert!(v.norm() < 1e-9, "Non-DC bin ({}, {}) = {}", r, c, v);
            }
        }
    }

    #[test]
    fn test_forward_inverse_roundtrip() {
        let img = ramp(5, 7);
        let fft = Fft2d::new(5, 7);
        let mut spectrum = fft.forward_real(&img);
        fft.inverse_inplace(&mut spectrum);

        for (orig, back) in img.iter().zip(spectrum.iter()) {
            assert!((orig - back.re).abs() < 1e-9);
            assert!(back.im.abs() < 1e-9);
        }
    }

    #[test]
    fn test_shift_moves_dc_to_centre() {
        let fft = Fft2d::new(4, 5);
        let shifted = fft_shift(&fft.forward_real(&Array2::from_elem((4, 5), 1.0)));
        assert!((shifted[[2, 2]].re - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_shift_inverse_odd_and_even() {
        for &(rows, cols) in &[(4, 4), (5, 7), (1, 3), (6, 1)] {
            let img = ramp(rows, cols);
            assert_eq!(ifft_shift(&fft_shift(&img)), img, "{}x{}", rows, cols);
        }
    }

    #[test]
    fn test_shift_matches_roll() {
        // 1x5: [0,1,2,3,4] -> [3,4,0,1,2]
        let row = Array2::from_shape_vec((1, 5), vec![0, 1, 2, 3, 4]).unwrap();
        let shifted = fft_shift(&row);
        assert_eq!(shifted.as_slice().unwrap(), &[3, 4, 0, 1, 2]);
        let back = ifft_shift(&shifted);
        assert_eq!(back, row);
    }
}
