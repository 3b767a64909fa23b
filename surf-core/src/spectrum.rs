//! # Spectrum Builder
//!
//! Turns a real sample series into a one-sided power spectrum:
//!
//! 1. `M` = smallest power of two ≥ `N`
//! 2. samples copied into the real part of an `M`-point buffer, zero-padded
//! 3. forward radix-2 FFT
//! 4. `spec[i] = |X[i]|²` for `i = 0..=M/2`
//! 5. `spec[0]` and `spec[M/2]` divided by `M`, interior bins scaled by `2/M`
//!
//! With that folding the spectrum sums to `Σ y²` of the (padded) series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::complex::Complex64;
use crate::error::{AnalysisError, Result};
use crate::fft::Radix2Plan;

/// One-sided power spectrum of a sample series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Power per bin in raw sample units squared, length `M/2 + 1`.
    pub power: Vec<f64>,
    /// Transform length `M`.
    pub transform_len: usize,
    /// Number of real samples `N` before padding.
    pub sample_count: usize,
    /// Vertical calibration factor (µm per raw unit) the samples were taken with.
    pub calibration_scale: f64,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.power.len()
    }

    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Power per bin converted to physical units (µm²).
    pub fn calibrated_power(&self) -> Vec<f64> {
        let factor = self.calibration_scale * self.calibration_scale;
        self.power.iter().map(|p| p * factor).collect()
    }

    /// Spatial frequency of `bin` in cycles per unit of `sample_interval`.
    pub fn frequency(&self, bin: usize, sample_interval: f64) -> f64 {
        bin as f64 / (self.transform_len as f64 * sample_interval)
    }

    /// Total spectral energy, `Σ power[i]`.
    pub fn total_power(&self) -> f64 {
        self.power.iter().sum()
    }
}

/// Smallest power of two that holds `sample_count` points.
pub fn transform_len(sample_count: usize) -> usize {
    sample_count.next_power_of_two()
}

/// Reusable transform and scratch buffers for spectrum computation.
///
/// One builder per profile avoids reallocating on repeated passes; the
/// buffers grow to the largest transform seen and are otherwise reused.
#[derive(Debug, Default)]
pub struct SpectrumBuilder {
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl SpectrumBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills the transform buffer with `samples` and zero padding up to `len`.
    fn load(&mut self, samples: &[f64], len: usize) {
        let zero = Complex64::new(0.0, 0.0);
        self.buffer.clear();
        self.buffer
            .extend(samples.iter().map(|&sample| Complex64::new(sample, 0.0)));
        self.buffer.resize(len, zero);
        self.scratch.clear();
        self.scratch.resize(len, zero);
    }

    /// The transform buffer left by the most recent `build`.
    pub fn transform(&self) -> &[Complex64] {
        &self.buffer
    }

    /// Computes the one-sided power spectrum of `samples`.
    ///
    /// # Arguments
    /// * `samples` - Sample series (ideally debiased)
    /// * `calibration_scale` - Vertical scale factor recorded with the result
    ///
    /// # Errors
    /// * `EmptySeries` - `samples` is empty
    /// * `InvalidTransformSize` - propagated from the FFT engine
    pub fn build(&mut self, samples: &[f64], calibration_scale: f64) -> Result<Spectrum> {
        if samples.is_empty() {
            return Err(AnalysisError::EmptySeries);
        }

        let m = transform_len(samples.len());
        let plan = Radix2Plan::new(m)?;
        self.load(samples, m);
        plan.process(&mut self.buffer, &mut self.scratch)?;

        let nyquist = m / 2;
        let scale = m as f64;
        let power = self.buffer[..=nyquist]
            .iter()
            .enumerate()
            .map(|(i, x)| {
                let energy = x.re * x.re + x.im * x.im;
                if i == 0 || i == nyquist {
                    energy / scale
                } else {
                    2.0 * energy / scale
                }
            })
            .collect::<Vec<_>>();

        debug!(
            samples = samples.len(),
            transform_len = m,
            bins = power.len(),
            "computed power spectrum"
        );

        Ok(Spectrum {
            power,
            transform_len: m,
            sample_count: samples.len(),
            calibration_scale,
        })
    }
}

/// Computes the one-sided power spectrum of `samples` with fresh buffers.
pub fn compute_spectrum(samples: &[f64], calibration_scale: f64) -> Result<Spectrum> {
    SpectrumBuilder::new().build(samples, calibration_scale)
}
