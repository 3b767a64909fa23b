//! # Roughness Statistics
//!
//! Amplitude parameters and autocorrelation coefficients computed directly
//! from a sample series. The amplitude fields are in raw sample units;
//! the autocorrelation coefficients already carry the square of the
//! vertical calibration factor. `RoughnessRecord::in_microns` converts the
//! amplitude fields.
//!
//! ## Parameters
//! - `mean`, `variance` (population, about the mean), `rms = √variance`
//! - `Ra`: arithmetic mean of `|y - mean|`
//! - `Rp`, `Rv`: largest excursion above / below the mean, never negative
//! - `Rt = Rp + Rv`
//! - `gamma0`, `gamma1`: lag-0 and lag-1 autocorrelation, `scale² · Σ/N`

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Roughness parameters of one sample series, recomputed in full per request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoughnessRecord {
    pub mean: f64,
    pub variance: f64,
    pub ra: f64,
    pub rp: f64,
    pub rv: f64,
    pub rt: f64,
    pub gamma0: f64,
    pub gamma1: f64,
    pub calibration_scale: f64,
}

/// Amplitude parameters in physical units (µm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibratedAmplitudes {
    pub rms: f64,
    pub ra: f64,
    pub rp: f64,
    pub rv: f64,
    pub rt: f64,
}

impl RoughnessRecord {
    pub fn rms(&self) -> f64 {
        self.variance.sqrt()
    }

    pub fn in_microns(&self) -> CalibratedAmplitudes {
        let k = self.calibration_scale;
        CalibratedAmplitudes {
            rms: self.rms() * k,
            ra: self.ra * k,
            rp: self.rp * k,
            rv: self.rv * k,
            rt: self.rt * k,
        }
    }
}

/// Autocorrelation at `lag`: `scale² · Σ_{i=lag}^{N-1} y[i]·y[i-lag] / N`.
///
/// The divisor is always `N`, not `N - lag`. Lags at or beyond `N` give zero.
///
/// # Errors
/// * `EmptySeries` - `samples` is empty
pub fn autocovariance(samples: &[f64], lag: usize, calibration_scale: f64) -> Result<f64> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let n = samples.len() as f64;
    let sum: f64 = samples
        .iter()
        .skip(lag)
        .zip(samples.iter())
        .map(|(current, earlier)| current * earlier)
        .sum();
    Ok(calibration_scale * calibration_scale * sum / n)
}

/// Computes the roughness parameters of `samples`.
///
/// # Arguments
/// * `samples` - Sample series, normally with the linear bias removed
/// * `calibration_scale` - Vertical calibration factor applied to `gamma0`/`gamma1`
///
/// # Errors
/// * `EmptySeries` - `samples` is empty
pub fn compute_roughness(samples: &[f64], calibration_scale: f64) -> Result<RoughnessRecord> {
    if samples.is_empty() {
        return Err(AnalysisError::EmptySeries);
    }
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;

    let mut variance = 0.0;
    let mut ra = 0.0;
    let mut rp: f64 = 0.0;
    let mut rv: f64 = 0.0;
    for &y in samples {
        let deviation = y - mean;
        variance += deviation * deviation;
        ra += deviation.abs();
        rp = rp.max(deviation);
        rv = rv.max(-deviation);
    }
    variance /= n;
    ra /= n;

    let record = RoughnessRecord {
        mean,
        variance,
        ra,
        rp,
        rv,
        rt: rp + rv,
        gamma0: autocovariance(samples, 0, calibration_scale)?,
        gamma1: autocovariance(samples, 1, calibration_scale)?,
        calibration_scale,
    };
    debug!(
        samples = samples.len(),
        rms = record.rms(),
        rt = record.rt,
        "computed roughness parameters"
    );
    Ok(record)
}
