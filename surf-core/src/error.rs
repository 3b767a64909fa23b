//! Error types for the analysis core and the capture loader.

use thiserror::Error;

/// Failures raised by the numeric pipeline.
///
/// Every variant is local and recoverable: the computation that raised it
/// leaves its inputs untouched beyond what had already been written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The transform length is not an exact power of two.
    #[error("transform length {0} is not a power of two")]
    InvalidTransformSize(usize),

    /// The scratch buffer handed to the FFT does not match the transform buffer.
    #[error("scratch buffer holds {actual} values but the transform needs {expected}")]
    ScratchLengthMismatch { expected: usize, actual: usize },

    /// The least-squares normal equations have no usable solution.
    #[error("least-squares fit is degenerate ({reason})")]
    NumericalDegeneracy { reason: &'static str },

    /// Complex division by a zero-magnitude divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A statistic was requested over a series with no samples.
    #[error("sample series is empty")]
    EmptySeries,
}

/// Failures raised while reading a profilometer capture file.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("cannot read capture file: {0}")]
    Io(#[from] std::io::Error),

    /// The file ended before the magnification and filter settings.
    #[error("capture file has no magnification/filter header")]
    MissingHeader,

    #[error("magnification setting {0} out of range - invalid file")]
    MagnificationOutOfRange(i64),

    #[error("filter setting {0} out of range - invalid file")]
    FilterOutOfRange(i64),

    /// A token could not be parsed as a number.
    #[error("invalid number {token:?} at token {position}")]
    InvalidNumber { position: usize, token: String },

    #[error("capture holds {found} samples but the filter setting requires {expected}")]
    Truncated { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
