//! Per-profile analysis session.
//!
//! Owns one sample series together with its transform arena and the cached
//! spectrum, and tracks which derived results are still valid for the
//! current version of the samples.

use tracing::{debug, info};

use crate::bias::{self, LineFit};
use crate::capture::Capture;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::roughness::{self, RoughnessRecord};
use crate::spectrum::{Spectrum, SpectrumBuilder};

/// One loaded profile and everything derived from it.
///
/// The series length is not capped by [`crate::capture::MAX_DATA`]; that
/// bound belongs to the instrument's capture files.
#[derive(Debug)]
pub struct ProfileSession {
    samples: Vec<f64>,
    calibration_scale: f64,
    sample_interval: f64,
    bias: Option<LineFit>,
    builder: SpectrumBuilder,
    spectrum: Option<Spectrum>,
}

impl ProfileSession {
    pub fn new(samples: Vec<f64>, calibration_scale: f64, sample_interval: f64) -> Self {
        Self {
            samples,
            calibration_scale,
            sample_interval,
            bias: None,
            builder: SpectrumBuilder::new(),
            spectrum: None,
        }
    }

    /// Starts a session from a loaded capture, applying configuration
    /// overrides and, when enabled, removing the linear bias once.
    pub fn from_capture(capture: Capture, config: &AnalysisConfig) -> Result<Self> {
        let scale = config.calibration_override.unwrap_or(capture.y_division);
        let interval = config.sample_interval_um.unwrap_or(capture.x_division);
        let mut session = Self::new(capture.samples, scale, interval);
        if config.remove_bias {
            session.remove_bias()?;
        }
        info!(
            samples = session.samples.len(),
            calibration_scale = scale,
            debiased = session.is_debiased(),
            "profile ready"
        );
        Ok(session)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn calibration_scale(&self) -> f64 {
        self.calibration_scale
    }

    pub fn sample_interval(&self) -> f64 {
        self.sample_interval
    }

    /// Line removed from the current samples, if any.
    pub fn bias(&self) -> Option<LineFit> {
        self.bias
    }

    pub fn is_debiased(&self) -> bool {
        self.bias.is_some()
    }

    pub fn is_spectrum_valid(&self) -> bool {
        self.spectrum.is_some()
    }

    /// Replaces the sample series, invalidating everything derived from it.
    pub fn replace_samples(&mut self, samples: Vec<f64>, calibration_scale: f64) {
        self.samples = samples;
        self.calibration_scale = calibration_scale;
        self.bias = None;
        self.spectrum = None;
        debug!(samples = self.samples.len(), "sample series replaced");
    }

    /// Removes the linear bias at most once per sample series.
    ///
    /// Later calls return the line removed by the first one.
    pub fn remove_bias(&mut self) -> Result<LineFit> {
        if let Some(fit) = self.bias {
            return Ok(fit);
        }
        let fit = bias::remove_bias(&mut self.samples)?;
        self.bias = Some(fit);
        self.spectrum = None;
        Ok(fit)
    }

    /// Spectrum of the current samples, computed on first use.
    pub fn spectrum(&mut self) -> Result<&Spectrum> {
        let spectrum = match self.spectrum.take() {
            Some(cached) => cached,
            None => self.builder.build(&self.samples, self.calibration_scale)?,
        };
        let cached: &Spectrum = self.spectrum.insert(spectrum);
        Ok(cached)
    }

    pub fn roughness(&self) -> Result<RoughnessRecord> {
        roughness::compute_roughness(&self.samples, self.calibration_scale)
    }
}
