//! # Surf - Surface Profile Analyzer
//!
//! Command-line front end for the `surf-core` analysis library. It loads a
//! profilometer capture, optionally removes the linear bias, and reports the
//! power spectrum and roughness parameters.
//!
//! ## Commands
//! - **spectrum**: compute the one-sided power spectrum, print or save it
//! - **params**: autocorrelation coefficients and rms/Ra/Rp/Rv/Rt in microns
//! - **analyze**: both, with a short summary

mod logging;
mod report;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueHint};
use surf_core::{AnalysisConfig, ProfileSession, load_capture};
use tracing::info;

use report::{OutputFormat, SpectrumView};

#[derive(Parser)]
#[command(author, version, about = "Spectrum and roughness analysis of profilometer traces")]
struct Cli {
    /// JSON file with analysis settings
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Keep the linear trend instead of removing it at load time
    #[arg(long, global = true)]
    no_detrend: bool,

    /// Vertical calibration in microns per raw unit, replacing the magnification table
    #[arg(long, global = true)]
    scale: Option<f64>,

    /// More log output (repeat for debug/trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the frequency spectrum of a capture
    Spectrum(SpectrumArgs),

    /// Compute the roughness parameters of a capture
    Params(ParamsArgs),

    /// Compute the spectrum and the parameters
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct SpectrumArgs {
    /// Capture file written by the profilometer
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// Write the spectrum here instead of stdout
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Report power in square microns rather than raw units
    #[arg(long)]
    calibrated: bool,

    /// Number of bins to report
    #[arg(long)]
    bins: Option<usize>,
}

#[derive(Args)]
struct ParamsArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[arg(value_hint = ValueHint::FilePath)]
    file: PathBuf,

    /// Also save the spectrum to this file (text listing)
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    out: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet);

    if let Err(err) = try_main(&cli) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    match &cli.command {
        Command::Spectrum(args) => run_spectrum(args, &config),
        Command::Params(args) => run_params(args, &config),
        Command::Analyze(args) => run_analyze(args, &config),
    }
}

/// Reads the optional config file and applies command-line overrides.
fn resolve_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => AnalysisConfig::default(),
    };
    if cli.no_detrend {
        config.remove_bias = false;
    }
    if let Some(scale) = cli.scale {
        config.calibration_override = Some(scale);
    }
    Ok(config)
}

fn read_config(path: &Path) -> Result<AnalysisConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn open_session(file: &Path, config: &AnalysisConfig) -> Result<ProfileSession> {
    let capture =
        load_capture(file).with_context(|| format!("failed to load {}", file.display()))?;
    ProfileSession::from_capture(capture, config).context("failed to prepare profile")
}

fn emit(output: &str, destination: Option<&Path>) -> Result<()> {
    match destination {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "saved output");
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn run_spectrum(args: &SpectrumArgs, config: &AnalysisConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    let bias = session.bias();
    let view = SpectrumView {
        calibrated: args.calibrated,
        sample_interval: session.sample_interval(),
        max_bins: args.bins.or(config.spectrum_bins),
    };
    let spectrum = session.spectrum().context("failed to compute spectrum")?;
    let output = report::render_spectrum(spectrum, bias.as_ref(), view, args.format)?;
    emit(&output, args.out.as_deref())
}

fn run_params(args: &ParamsArgs, config: &AnalysisConfig) -> Result<()> {
    let session = open_session(&args.file, config)?;
    let record = session.roughness().context("failed to compute parameters")?;
    let output = report::render_parameters(&record, args.format)?;
    emit(&output, None)
}

fn run_analyze(args: &AnalyzeArgs, config: &AnalysisConfig) -> Result<()> {
    let mut session = open_session(&args.file, config)?;
    let record = session.roughness().context("failed to compute parameters")?;
    let bias = session.bias();
    let view = SpectrumView {
        calibrated: false,
        sample_interval: session.sample_interval(),
        max_bins: config.spectrum_bins,
    };
    let spectrum = session.spectrum().context("failed to compute spectrum")?;

    println!("File: {}", args.file.display());
    println!(
        "Samples: {}  Transform length: {}  Spectrum bins: {}",
        spectrum.sample_count,
        spectrum.transform_len,
        spectrum.len()
    );
    if let Some(fit) = bias {
        println!(
            "Removed trend: intercept {} slope {}",
            report::round_significant(fit.intercept, report::SIG_FIG),
            report::round_significant(fit.slope, report::SIG_FIG)
        );
    }
    println!();
    print!("{}", report::render_parameters(&record, OutputFormat::Text)?);

    if let Some(path) = &args.out {
        let output = report::render_spectrum(spectrum, bias.as_ref(), view, OutputFormat::Text)?;
        emit(&output, Some(path))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "calibration_override": 0.5, "spectrum_bins": 16 }}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["surf", "--config", path.as_str(), "--scale", "0.25", "--no-detrend", "params", "trace.txt"]);
        let config = resolve_config(&cli).unwrap();
        assert!(!config.remove_bias);
        assert_eq!(config.calibration_override, Some(0.25));
        assert_eq!(config.spectrum_bins, Some(16));
    }

    fn write_capture(dir: &Path) -> PathBuf {
        let path = dir.join("trace.txt");
        let mut text = String::from("5\n1\n");
        for i in 0..1750 {
            text.push_str(&format!("{}\n", (i % 13) as f64 + 0.01 * i as f64));
        }
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_spectrum_saves_json_bins() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("spectrum.json");
        let args = SpectrumArgs {
            file: write_capture(dir.path()),
            out: Some(out.clone()),
            format: OutputFormat::Json,
            calibrated: false,
            bins: None,
        };
        run_spectrum(&args, &AnalysisConfig::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(value["sample_count"], 1750);
        assert_eq!(value["transform_len"], 2048);
        assert_eq!(value["bins"].as_array().unwrap().len(), 2048 / 2 + 1);
        assert!(value.get("bias").is_some());
    }

    #[test]
    fn test_spectrum_bin_flag_beats_config() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("spectrum.txt");
        let args = SpectrumArgs {
            file: write_capture(dir.path()),
            out: Some(out.clone()),
            format: OutputFormat::Text,
            calibrated: true,
            bins: Some(8),
        };
        let config = AnalysisConfig {
            spectrum_bins: Some(32),
            ..AnalysisConfig::default()
        };
        run_spectrum(&args, &config).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1 + 8);
        assert!(text.lines().nth(1).unwrap().starts_with("0  0  "));
    }

    #[test]
    fn test_analyze_saves_text_listing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("listing.txt");
        let args = AnalyzeArgs {
            file: write_capture(dir.path()),
            out: Some(out.clone()),
        };
        run_analyze(&args, &AnalysisConfig::default()).unwrap();

        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("1750"));
        assert_eq!(lines.count(), 1025);
    }

    #[test]
    fn test_params_runs_on_capture() {
        let dir = tempfile::tempdir().unwrap();
        let args = ParamsArgs {
            file: write_capture(dir.path()),
            format: OutputFormat::Json,
        };
        run_params(&args, &AnalysisConfig::default()).unwrap();
    }

    #[test]
    fn test_missing_capture_reports_path() {
        let err = open_session(Path::new("no-such-trace.txt"), &AnalysisConfig::default())
            .unwrap_err();
        assert!(format!("{err:#}").contains("no-such-trace.txt"));
    }
}
