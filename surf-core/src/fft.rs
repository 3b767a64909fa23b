//! # Fast Fourier Transform (FFT) Module
//!
//! An in-place radix-2 transform over a complex buffer whose length is a
//! power of two. Each of the `log2(M)` stages reads the transform buffer and
//! writes a scratch buffer of equal length, which is then copied back, so
//! the output comes out in natural frequency order without a separate
//! bit-reversal pass.
//!
//! ## Features
//! - Unnormalized forward DFT (no `1/M` factor; scaling belongs to the caller)
//! - Root of unity computed once per plan
//! - Single-element buffers pass through unchanged

use tracing::trace;

use crate::complex::{self, Complex64};
use crate::error::{AnalysisError, Result};

/// A forward transform of fixed length `M = 2^k`.
///
/// The plan only stores `M` and `exp(-2πi/M)`; buffers are supplied per call.
#[derive(Debug, Clone, Copy)]
pub struct Radix2Plan {
    len: usize,
    root: Complex64,
}

impl Radix2Plan {
    /// Prepares a transform of `len` points.
    ///
    /// # Errors
    /// * `InvalidTransformSize` - `len` is zero or not a power of two
    pub fn new(len: usize) -> Result<Self> {
        if !len.is_power_of_two() {
            return Err(AnalysisError::InvalidTransformSize(len));
        }
        let angle = -2.0 * std::f64::consts::PI / len as f64;
        Ok(Self {
            len,
            root: Complex64::new(angle.cos(), angle.sin()),
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Performs the forward transform of `buffer` in place.
    ///
    /// Stage `s` works on groups of `2·half` outputs (`half = 2^(s-1)`).
    /// Group `g` pairs input `top = g·half + r` with `bottom = top + M/2`,
    /// writing `top + bottom` to output `g·2·half + r` and
    /// `w · (top − bottom)` to output `g·2·half + r + half`, where the
    /// twiddle `w` starts at `1` and advances by `root^half` per group.
    ///
    /// # Arguments
    /// * `buffer` - Transform buffer of length `M`, overwritten with the DFT
    /// * `scratch` - Working buffer of length `M`; contents are discarded
    ///
    /// # Errors
    /// * `InvalidTransformSize` - `buffer.len()` differs from the plan length
    /// * `ScratchLengthMismatch` - `scratch.len()` differs from the plan length
    pub fn process(&self, buffer: &mut [Complex64], scratch: &mut [Complex64]) -> Result<()> {
        if buffer.len() != self.len {
            return Err(AnalysisError::InvalidTransformSize(buffer.len()));
        }
        if scratch.len() != self.len {
            return Err(AnalysisError::ScratchLengthMismatch {
                expected: self.len,
                actual: scratch.len(),
            });
        }

        let m = self.len;
        let midpoint = m / 2;
        let stages = m.trailing_zeros();

        for stage in 1..=stages {
            let half = 1usize << (stage - 1);
            let group_size = 2 * half;
            let group_count = m / group_size;
            let step = complex::power(self.root, half as f64);
            let mut twiddle = Complex64::new(1.0, 0.0);

            for group in 0..group_count {
                let input = group * half;
                let output = group * group_size;
                for r in 0..half {
                    let top = buffer[input + r];
                    let bottom = buffer[input + r + midpoint];
                    scratch[output + r] = complex::sum(top, bottom);
                    scratch[output + r + half] =
                        complex::product(twiddle, complex::diff(top, bottom));
                }
                twiddle = complex::product(twiddle, step);
            }

            buffer.copy_from_slice(scratch);
            trace!(stage, half, group_count, "fft stage complete");
        }

        Ok(())
    }
}

/// Transforms `buffer` in place using `scratch` as the stage buffer.
///
/// Convenience wrapper that plans for `buffer.len()` on every call.
pub fn transform(buffer: &mut [Complex64], scratch: &mut [Complex64]) -> Result<()> {
    Radix2Plan::new(buffer.len())?.process(buffer, scratch)
}
