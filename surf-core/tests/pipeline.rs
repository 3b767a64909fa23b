//! End-to-end checks: capture file on disk through to spectrum and parameters.

use std::io::Write;

use approx::{assert_abs_diff_eq, assert_relative_eq};
use surf_core::{
    AnalysisConfig, CaptureError, Filter, ProfileSession, compute_roughness, compute_spectrum,
    load_capture, remove_bias,
};
use tempfile::NamedTempFile;

/// Tilted sinusoidal profile in raw counts.
fn tilted_profile(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let x = i as f64;
            40.0 + 0.02 * x + 12.0 * (2.0 * std::f64::consts::PI * x / 50.0).sin()
        })
        .collect()
}

fn write_capture(magnification: u8, filter: u8, samples: &[f64]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{magnification}").unwrap();
    writeln!(file, "{filter}").unwrap();
    for sample in samples {
        writeln!(file, "{sample}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn load_debias_and_analyze() {
    let raw = tilted_profile(Filter::J.sample_count());
    let file = write_capture(5, 1, &raw);

    let capture = load_capture(file.path()).unwrap();
    assert_eq!(capture.samples.len(), 1750);
    assert_relative_eq!(capture.y_division, 2.5 / 256.0);

    let mut session = ProfileSession::from_capture(capture, &AnalysisConfig::default()).unwrap();
    let fit = session.bias().unwrap();
    assert!(fit.slope > 0.0);

    let mean: f64 = session.samples().iter().sum::<f64>() / 1750.0;
    assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-9);

    let spectrum = session.spectrum().unwrap().clone();
    assert_eq!(spectrum.transform_len, 2048);
    assert_eq!(spectrum.len(), 1025);

    // The 50-sample period should dominate: bin ≈ 2048 / 50 ≈ 41
    let peak = spectrum
        .power
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(bin, _)| bin)
        .unwrap();
    assert!((40..=42).contains(&peak), "peak at bin {peak}");

    let energy: f64 = session.samples().iter().map(|y| y * y).sum();
    assert_relative_eq!(spectrum.total_power(), energy, max_relative = 1e-9);

    let record = session.roughness().unwrap();
    assert_abs_diff_eq!(record.mean, 0.0, epsilon = 1e-9);
    assert_relative_eq!(record.gamma0, record.variance * (2.5f64 / 256.0).powi(2), max_relative = 1e-9);
    assert!(record.rp > 10.0 && record.rv > 10.0);
    assert_relative_eq!(record.rt, record.rp + record.rv);
}

#[test]
fn free_functions_agree_with_session() {
    let mut samples = tilted_profile(300);
    let mut session = ProfileSession::new(samples.clone(), 0.01, 1.0);

    remove_bias(&mut samples).unwrap();
    session.remove_bias().unwrap();
    assert_eq!(session.samples(), samples.as_slice());

    let spectrum = compute_spectrum(&samples, 0.01).unwrap();
    assert_eq!(session.spectrum().unwrap(), &spectrum);
    assert_eq!(session.roughness().unwrap(), compute_roughness(&samples, 0.01).unwrap());
}

#[test]
fn truncated_capture_is_reported() {
    let file = write_capture(2, 3, &tilted_profile(100));
    let err = load_capture(file.path()).unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Truncated {
            expected: 7500,
            found: 100
        }
    ));
}
