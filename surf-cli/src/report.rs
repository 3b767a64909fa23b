//! # Report Rendering
//!
//! Text and JSON renderings of spectra and roughness parameters. Text
//! values are rounded to `SIG_FIG` significant figures.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use surf_core::{LineFit, RoughnessRecord, Spectrum};

/// Significant figures used in text reports.
pub const SIG_FIG: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Rounds `value` to `figures` significant figures.
///
/// Zero and non-finite values are returned unchanged. The rounding goes
/// through the decimal exponent form, so subnormal and huge values keep
/// their magnitude.
///
/// # Example
/// `round_significant(123.45, 2) == 120.0`
pub fn round_significant(value: f64, figures: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let digits = (figures.max(1) - 1) as usize;
    format!("{value:.digits$e}").parse().unwrap_or(value)
}

/// Formats `value` with `figures` significant figures for text reports.
///
/// Magnitudes in `[1e-4, 10^figures)` use plain decimals, anything else
/// uses exponent notation. Trailing zeros are dropped in both forms.
pub fn format_significant(value: f64, figures: i32) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let figures = figures.max(1);
    let magnitude = value.abs();
    if (1e-4..10f64.powi(figures)).contains(&magnitude) {
        let exponent = magnitude.log10().floor() as i32;
        let decimals = (figures - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    } else {
        let digits = (figures - 1) as usize;
        let text = format!("{value:.digits$e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{exponent}", trim_fraction(mantissa)),
            None => text,
        }
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Spectrum rows as written to disk or stdout.
#[derive(Debug, Serialize)]
struct SpectrumReport<'a> {
    sample_count: usize,
    transform_len: usize,
    calibration_scale: f64,
    calibrated: bool,
    bins: Vec<SpectrumRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bias: Option<&'a LineFit>,
}

#[derive(Debug, Serialize)]
struct SpectrumRow {
    bin: usize,
    frequency: f64,
    power: f64,
}

/// Options controlling how a spectrum is rendered.
#[derive(Debug, Clone, Copy)]
pub struct SpectrumView {
    pub calibrated: bool,
    pub sample_interval: f64,
    pub max_bins: Option<usize>,
}

/// Renders a spectrum.
///
/// The text form starts with the sample count followed by one
/// `bin  frequency  power` line per bin.
pub fn render_spectrum(
    spectrum: &Spectrum,
    bias: Option<&LineFit>,
    view: SpectrumView,
    format: OutputFormat,
) -> Result<String> {
    let values = if view.calibrated {
        spectrum.calibrated_power()
    } else {
        spectrum.power.clone()
    };
    let limit = view.max_bins.unwrap_or(values.len()).min(values.len());
    let bins: Vec<SpectrumRow> = values
        .iter()
        .take(limit)
        .enumerate()
        .map(|(bin, &power)| SpectrumRow {
            bin,
            frequency: spectrum.frequency(bin, view.sample_interval),
            power,
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let report = SpectrumReport {
                sample_count: spectrum.sample_count,
                transform_len: spectrum.transform_len,
                calibration_scale: spectrum.calibration_scale,
                calibrated: view.calibrated,
                bins,
                bias,
            };
            Ok(serde_json::to_string_pretty(&report)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "{}", spectrum.sample_count)?;
            for row in &bins {
                writeln!(
                    out,
                    "{}  {}  {}",
                    row.bin,
                    format_significant(row.frequency, SIG_FIG),
                    format_significant(row.power, SIG_FIG)
                )?;
            }
            Ok(out)
        }
    }
}

/// Renders the autocorrelation coefficients and amplitude parameters.
pub fn render_parameters(record: &RoughnessRecord, format: OutputFormat) -> Result<String> {
    let microns = record.in_microns();
    match format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ParameterReport<'a> {
                raw: &'a RoughnessRecord,
                microns: surf_core::CalibratedAmplitudes,
                gamma_units: &'static str,
            }
            Ok(serde_json::to_string_pretty(&ParameterReport {
                raw: record,
                microns,
                gamma_units: "microns^2",
            })?)
        }
        OutputFormat::Text => {
            let r = |v: f64| format_significant(v, SIG_FIG);
            let mut out = String::new();
            writeln!(out, "Parameters")?;
            writeln!(out, "--------------")?;
            writeln!(out)?;
            writeln!(out, "Autocorrelation values")?;
            writeln!(out, "----------------------")?;
            writeln!(out, "first correlation coefficient: {:>12} microns^2", r(record.gamma0))?;
            writeln!(out, "second autocorrelation coefficient: {:>12} microns^2", r(record.gamma1))?;
            writeln!(out)?;
            writeln!(out, "Parameter values")?;
            writeln!(out, "----------------------")?;
            writeln!(out, "rms value : {:>12} microns", r(microns.rms))?;
            writeln!(out, "Ra value : {:>12} microns", r(microns.ra))?;
            writeln!(out, "Rp value : {:>12} microns", r(microns.rp))?;
            writeln!(out, "Rv value : {:>12} microns", r(microns.rv))?;
            writeln!(out, "Rt value : {:>12} microns", r(microns.rt))?;
            Ok(out)
        }
    }
}
