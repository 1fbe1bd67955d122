mod common;
use common::{alpha_signal, labels, write_edf, write_edf_rates, DIGITAL_PER_UV};
use ictal::edf::open_edf;
use ictal::Error;

#[test]
fn header_fields_are_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    write_edf(&path, &["FP1-F7", "F7-T7"], 64, 5, alpha_signal(100.0, 64));

    let raw = open_edf(&path).unwrap();
    assert_eq!(raw.header.n_signals, 2);
    assert_eq!(raw.header.header_bytes, 768);
    assert_eq!(raw.n_records, 5);
    assert_eq!(raw.ch_names, vec!["FP1-F7", "F7-T7"]);
    assert_eq!(raw.sfreq(0), 64.0);
    assert_eq!(raw.n_times(1), 320);
    assert!(!raw.header.is_edf_plus());
}

#[test]
fn samples_are_calibrated_to_volts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    let signal = |ch: usize, t: usize| (ch as f64 + 1.0) * (t as f64 - 100.0);
    write_edf(&path, &["A", "B"], 32, 10, signal);

    let raw = open_edf(&path).unwrap();
    // Read in reverse order to check pick ordering.
    let data = raw.read_signals(&[1, 0]).unwrap();
    assert_eq!(data.dim(), (2, 320));
    let resolution = 1e-6 / DIGITAL_PER_UV;
    for t in [0usize, 31, 32, 200, 319] {
        approx::assert_abs_diff_eq!(data[[0, t]], signal(1, t) * 1e-6, epsilon = resolution);
        approx::assert_abs_diff_eq!(data[[1, t]], signal(0, t) * 1e-6, epsilon = resolution);
    }
}

#[test]
fn duplicate_labels_are_numbered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    write_edf(&path, &["T8-P8", "P8-O2", "T8-P8"], 16, 1, |_, _| 0.0);
    let raw = open_edf(&path).unwrap();
    assert_eq!(raw.ch_names, vec!["T8-P8-0", "P8-O2", "T8-P8-1"]);
}

#[test]
fn truncated_file_keeps_complete_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    write_edf(&path, &["A"], 16, 4, |_, t| t as f64);
    let bytes = std::fs::read(&path).unwrap();
    // Drop half of the last record.
    std::fs::write(&path, &bytes[..bytes.len() - 16]).unwrap();

    let raw = open_edf(&path).unwrap();
    assert_eq!(raw.n_records, 3);
    assert_eq!(raw.read_signals(&[0]).unwrap().ncols(), 48);
}

#[test]
fn missing_file_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_edf(dir.path().join("absent.edf")).unwrap_err();
    assert!(matches!(err, Error::Load { .. }));
}

#[test]
fn garbage_header_is_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.edf");
    std::fs::write(&path, vec![b'x'; 600]).unwrap();
    assert!(matches!(open_edf(&path), Err(Error::Load { .. })));
}

#[test]
fn mixed_rate_picks_are_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec.edf");
    write_edf_rates(&path, &["FP1-F7", "ECG", "F7-T7"], &[64, 32, 64], 3, |_, t| t as f64);

    let raw = open_edf(&path).unwrap();
    assert_eq!(raw.sfreq(1), 32.0);
    assert_eq!(raw.read_signals(&[0, 2]).unwrap().dim(), (2, 192));
    assert_eq!(raw.read_signals(&[1]).unwrap().dim(), (1, 96));

    match raw.read_signals(&[0, 1]) {
        Err(Error::Load { message, .. }) => assert!(message.contains("sampled at"), "{message}"),
        other => panic!("expected Load error, got {other:?}"),
    }

    let err = ictal::load_recording(&path, &labels(&["F7-T7", "ECG"])).unwrap_err();
    assert!(matches!(err, Error::Load { .. }), "{err}");
}
