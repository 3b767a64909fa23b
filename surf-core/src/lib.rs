// surf-core/src/lib.rs

//! The core logic for the surface-profile analyzer.
//! This crate is responsible for bias removal, the Fourier transform,
//! power spectra and roughness parameters of profilometer traces. It is
//! completely headless and contains no terminal or presentation code.
//!
//! The three entry points below can be called independently and in any
//! order; [`ProfileSession`] ties them to one owned sample series.

pub mod bias;
pub mod capture;
pub mod complex;
pub mod config;
pub mod error;
pub mod fft;
pub mod profile;
pub mod roughness;
pub mod spectrum;

pub use bias::{LineFit, remove_bias};
pub use capture::{Capture, Filter, load_capture, parse_capture};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, CaptureError};
pub use profile::ProfileSession;
pub use roughness::{CalibratedAmplitudes, RoughnessRecord, compute_roughness};
pub use spectrum::{Spectrum, SpectrumBuilder, compute_spectrum};
