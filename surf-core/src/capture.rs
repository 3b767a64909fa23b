//! # Capture Loading Module
//!
//! Reads the text files written by the profilometer. A capture holds the
//! magnification setting, the filter setting, and then exactly as many
//! height samples as that filter produces per traverse, all separated by
//! whitespace.
//!
//! ## Calibration
//! - Vertical: `magnification / HALF_SCALE_COUNTS` µm per raw unit
//! - Horizontal: `SAMPLE_INTERVAL_UM` between consecutive samples

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CaptureError;

/// Distance between consecutive samples in µm.
pub const SAMPLE_INTERVAL_UM: f64 = 1.0;

/// Half-scale deflection in raw counts.
pub const HALF_SCALE_COUNTS: f64 = 256.0;

/// Upper bound on samples in one instrument traverse.
///
/// This limits capture files only. Every filter's sample count stays below
/// it; the numeric entry points size their buffers from the series itself
/// and accept longer series.
pub const MAX_DATA: usize = 8192;

/// Half-scale range in µm for magnification settings 1 through 8.
pub const MAGNIFICATION_UM: [f64; 8] = [50.0, 25.0, 12.5, 5.0, 2.5, 1.25, 0.5, 0.25];

/// Traverse filters and the number of samples each one records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    J,
    K,
    L,
}

impl Filter {
    /// Maps the numeric setting stored in a capture file (1..=3).
    pub fn from_setting(setting: i64) -> Result<Self, CaptureError> {
        match setting {
            1 => Ok(Filter::J),
            2 => Ok(Filter::K),
            3 => Ok(Filter::L),
            other => Err(CaptureError::FilterOutOfRange(other)),
        }
    }

    pub fn sample_count(self) -> usize {
        match self {
            Filter::J => 1750,
            Filter::K => 4000,
            Filter::L => 7500,
        }
    }
}

/// Looks up the vertical scale (µm per raw unit) for a magnification setting.
pub fn vertical_scale(magnification: i64) -> Result<f64, CaptureError> {
    usize::try_from(magnification)
        .ok()
        .and_then(|setting| setting.checked_sub(1))
        .and_then(|index| MAGNIFICATION_UM.get(index))
        .map(|range| range / HALF_SCALE_COUNTS)
        .ok_or(CaptureError::MagnificationOutOfRange(magnification))
}

/// A profile trace as read from disk, before any bias removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub magnification: u8,
    pub filter: Filter,
    pub samples: Vec<f64>,
    /// Vertical calibration, µm per raw unit.
    pub y_division: f64,
    /// Horizontal calibration, µm per sample.
    pub x_division: f64,
}

fn parse_setting(token: Option<(usize, &str)>) -> Result<i64, CaptureError> {
    let (position, token) = token.ok_or(CaptureError::MissingHeader)?;
    token.parse::<i64>().map_err(|_| CaptureError::InvalidNumber {
        position,
        token: token.to_string(),
    })
}

/// Parses the text of a capture file.
///
/// # Errors
/// * `MissingHeader` - fewer than two tokens
/// * `MagnificationOutOfRange` / `FilterOutOfRange` - settings outside the table
/// * `InvalidNumber` - a token that is not a number
/// * `Truncated` - fewer samples than the filter requires
pub fn parse_capture(text: &str) -> Result<Capture, CaptureError> {
    let mut tokens = text.split_whitespace().enumerate();

    let magnification = parse_setting(tokens.next())?;
    let filter_setting = parse_setting(tokens.next())?;
    let y_division = vertical_scale(magnification)?;
    let filter = Filter::from_setting(filter_setting)?;

    let expected = filter.sample_count();
    let samples = tokens
        .by_ref()
        .take(expected)
        .map(|(position, token)| {
            token.parse::<f64>().map_err(|_| CaptureError::InvalidNumber {
                position,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    if samples.len() < expected {
        return Err(CaptureError::Truncated {
            expected,
            found: samples.len(),
        });
    }

    let trailing = tokens.count();
    if trailing > 0 {
        debug!(trailing, "ignoring tokens after the last sample");
    }

    Ok(Capture {
        // vertical_scale accepted it, so it is 1..=8
        magnification: magnification as u8,
        filter,
        samples,
        y_division,
        x_division: SAMPLE_INTERVAL_UM,
    })
}

/// Reads and parses a capture file from disk.
pub fn load_capture(path: impl AsRef<Path>) -> Result<Capture, CaptureError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let capture = parse_capture(&text)?;
    debug!(
        path = %path.display(),
        magnification = capture.magnification,
        filter = ?capture.filter,
        samples = capture.samples.len(),
        "loaded capture"
    );
    Ok(capture)
}
