//! # Bias Removal
//!
//! Removes the linear trend from a profile trace by fitting `y = a + b·i`
//! over the sample index with ordinary least squares and subtracting the
//! fitted line in place.
//!
//! The fit solves the normal equations
//!
//! ```text
//! N·a  + Sx·b  = Sy
//! Sx·a + Sxx·b = Sxy
//! ```
//!
//! in the form `b = (Sy·Sx − N·Sxy) / (Sx² − N·Sxx)`,
//! `a = (Sxy − Sxx·b) / Sx`. Both divisions are guarded; a series too short
//! to define a line is reported instead of being filled with NaN.
//!
//! Repeated passes over an already-debiased series fit a line that is zero
//! to within rounding, not bit-for-bit zero.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};

/// The line removed from a series: `height = intercept + slope · index`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineFit {
    pub intercept: f64,
    pub slope: f64,
}

impl LineFit {
    /// Height of the fitted line at sample `index`.
    pub fn at(&self, index: usize) -> f64 {
        self.intercept + self.slope * index as f64
    }
}

/// Fits the least-squares line through `(i, samples[i])`.
///
/// # Errors
/// * `NumericalDegeneracy` - fewer than two samples, a vanishing
///   denominator, or a non-finite coefficient (e.g. NaN heights)
pub fn fit_line(samples: &[f64]) -> Result<LineFit> {
    let n = samples.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in samples.iter().enumerate() {
        let x = i as f64;
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }

    if samples.len() < 2 {
        warn!(samples = samples.len(), "bias fit rejected: too few samples");
        return Err(AnalysisError::NumericalDegeneracy {
            reason: "fewer than two samples",
        });
    }

    // For i = 0..N-1 the denominator is -N²(N²-1)/12; this only trips when
    // the index sums themselves lose precision.
    let denominator = sx * sx - n * sxx;
    if denominator.abs() <= f64::EPSILON * n * sxx || sx.abs() < f64::EPSILON {
        warn!(denominator, sx, "bias fit rejected: vanishing denominator");
        return Err(AnalysisError::NumericalDegeneracy {
            reason: "vanishing denominator",
        });
    }

    let slope = (sy * sx - n * sxy) / denominator;
    let intercept = (sxy - sxx * slope) / sx;
    if !slope.is_finite() || !intercept.is_finite() {
        warn!(slope, intercept, "bias fit rejected: non-finite coefficients");
        return Err(AnalysisError::NumericalDegeneracy {
            reason: "non-finite coefficients",
        });
    }

    Ok(LineFit { intercept, slope })
}

/// Subtracts the least-squares line from `samples` in place.
///
/// Nothing is written when the fit fails.
///
/// # Returns
/// * `Ok(fit)` - the line that was removed
pub fn remove_bias(samples: &mut [f64]) -> Result<LineFit> {
    let fit = fit_line(samples)?;
    for (i, y) in samples.iter_mut().enumerate() {
        *y -= fit.at(i);
    }
    debug!(
        samples = samples.len(),
        intercept = fit.intercept,
        slope = fit.slope,
        "removed linear bias"
    );
    Ok(fit)
}
