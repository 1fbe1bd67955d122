use ictal::filter::{apply_fir_zero_phase, design_bandpass, filter_1d, gain_at};
use ndarray::Array2;
use std::f64::consts::PI;

const SFREQ: f64 = 256.0;

fn tone(freq: f64, amp: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| amp * (2.0 * PI * freq * i as f64 / SFREQ).sin()).collect()
}

// ── Response ─────────────────────────────────────────────────────────────────

#[test]
fn passband_flat_stopbands_attenuated() {
    let h = design_bandpass(8.0, 13.0, SFREQ);
    for f in [9.0, 10.0, 11.0, 12.0] {
        let g = gain_at(&h, f, SFREQ);
        assert!((g - 1.0).abs() < 0.01, "gain at {f} Hz = {g:.4}");
    }
    for f in [0.5, 3.0, 5.5, 17.0, 25.0, 50.0, 60.0, 100.0] {
        let g = gain_at(&h, f, SFREQ);
        assert!(g < 0.01, "gain at {f} Hz = {g:.4}");
    }
}

#[test]
fn other_sampling_rates_keep_the_band() {
    for sfreq in [128.0, 200.0, 512.0] {
        let h = design_bandpass(8.0, 13.0, sfreq);
        assert_eq!(h.len() % 2, 1);
        assert!((gain_at(&h, 10.5, sfreq) - 1.0).abs() < 0.01, "sfreq {sfreq}");
        assert!(gain_at(&h, 40.0, sfreq) < 0.01, "sfreq {sfreq}");
    }
}

// ── Application ──────────────────────────────────────────────────────────────

#[test]
fn filter_keeps_alpha_and_drops_the_rest() {
    let n = 30 * SFREQ as usize;
    let alpha = tone(10.0, 1.0, n);
    let x: Vec<f64> = alpha
        .iter()
        .zip(tone(2.0, 1.0, n))
        .zip(tone(50.0, 1.0, n))
        .map(|((a, b), c)| a + b + c + 0.7)
        .collect();

    let h = design_bandpass(8.0, 13.0, SFREQ);
    let y = filter_1d(&x, &h);

    // Zero-phase: the output lines up with the unshifted 10 Hz component.
    let guard = h.len();
    let max_err = y[guard..n - guard]
        .iter()
        .zip(&alpha[guard..n - guard])
        .map(|(a, b)| (a - b).abs())
        .fold(0.0_f64, f64::max);
    assert!(max_err < 0.05, "max deviation from the alpha tone: {max_err:.4}");
}

#[test]
fn channels_are_filtered_independently() {
    let n = 20 * SFREQ as usize;
    let h = design_bandpass(8.0, 13.0, SFREQ);
    let rows = [tone(10.0, 2.0, n), tone(40.0, 5.0, n), vec![0.0; n]];

    let mut data = Array2::from_shape_fn((3, n), |(c, t)| rows[c][t]);
    apply_fir_zero_phase(&mut data, &h);

    for (c, row) in rows.iter().enumerate() {
        let expected = filter_1d(row, &h);
        for t in [0, n / 3, n / 2, n - 1] {
            approx::assert_abs_diff_eq!(data[[c, t]], expected[t], epsilon = 1e-12);
        }
    }
    assert!(data.row(2).iter().all(|v| *v == 0.0));
}
