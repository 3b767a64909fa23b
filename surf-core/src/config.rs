//! Analysis settings shared by the library session and the command front end.

use serde::{Deserialize, Serialize};

/// How a loaded profile is prepared and reported.
///
/// Every field has a default so a partial JSON file is enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Subtract the least-squares line once at load time.
    pub remove_bias: bool,
    /// Vertical scale (µm per raw unit) replacing the magnification table value.
    pub calibration_override: Option<f64>,
    /// Horizontal sample spacing in µm replacing the instrument default.
    pub sample_interval_um: Option<f64>,
    /// Number of spectrum rows to report; `None` reports every bin.
    pub spectrum_bins: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            remove_bias: true,
            calibration_override: None,
            sample_interval_um: None,
            spectrum_bins: None,
        }
    }
}
