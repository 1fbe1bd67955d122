//! Band-pass FIR design with MNE's automatic parameters.
//!
//! ```text
//! l_tb = min(max(l / 4, 2), l)               transition below the band (Hz)
//! h_tb = min(max(h / 4, 2), sfreq / 2 − h)   transition above the band (Hz)
//! N    = odd(ceil(3.3 / min(l_tb, h_tb) · sfreq))
//! h    = lowpass(h + h_tb / 2) − lowpass(l − l_tb / 2)
//! ```
//!
//! Each lowpass is a Hamming-windowed sinc normalised to unit DC gain, so
//! their difference passes no DC.
use std::f64::consts::PI;

/// Length factor of the Hamming window (main-lobe width in bins).
const HAMMING_LENGTH_FACTOR: f64 = 3.3;

/// Smallest automatic transition bandwidth.
const MIN_TRANSITION_HZ: f64 = 2.0;

/// Transition bandwidth below `l_freq`.
pub fn auto_trans_bandwidth_low(l_freq: f64) -> f64 {
    (l_freq / 4.0).max(MIN_TRANSITION_HZ).min(l_freq)
}

/// Transition bandwidth above `h_freq`, capped by the Nyquist frequency.
pub fn auto_trans_bandwidth_high(h_freq: f64, sfreq: f64) -> f64 {
    (h_freq / 4.0).max(MIN_TRANSITION_HZ).min(sfreq / 2.0 - h_freq)
}

/// Odd number of taps giving a transition of `trans_bw` Hz.
pub fn auto_filter_length(trans_bw: f64, sfreq: f64) -> usize {
    ((HAMMING_LENGTH_FACTOR / trans_bw * sfreq).ceil() as usize) | 1
}

/// Zero-phase band-pass `[l_freq, h_freq]` Hz for signals sampled at `sfreq`.
///
/// Transition bandwidths and length follow MNE's automatic choices; both
/// edges share the length of the narrower transition. `sfreq` must exceed
/// `2 · h_freq`.
pub fn design_bandpass(l_freq: f64, h_freq: f64, sfreq: f64) -> Vec<f64> {
    let l_tb = auto_trans_bandwidth_low(l_freq);
    let h_tb = auto_trans_bandwidth_high(h_freq, sfreq);
    let n = auto_filter_length(l_tb.min(h_tb), sfreq);

    let keep = windowed_sinc(n, h_freq + h_tb / 2.0, sfreq);
    let drop = windowed_sinc(n, l_freq - l_tb / 2.0, sfreq);
    keep.iter().zip(&drop).map(|(k, d)| k - d).collect()
}

/// Unit-DC-gain lowpass of `n` (odd) taps with its −6 dB point at `cutoff_hz`.
pub fn windowed_sinc(n: usize, cutoff_hz: f64, sfreq: f64) -> Vec<f64> {
    let fc = 2.0 * cutoff_hz / sfreq;
    let centre = n / 2;

    let mut h: Vec<f64> = hamming(n)
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            let x = i as f64 - centre as f64;
            let ideal = if i == centre { fc } else { (PI * fc * x).sin() / (PI * x) };
            ideal * w
        })
        .collect();

    let dc: f64 = h.iter().sum();
    h.iter_mut().for_each(|v| *v /= dc);
    h
}

/// Symmetric Hamming window.
pub fn hamming(n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![1.0; n];
    }
    let span = (n - 1) as f64;
    (0..n)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / span).cos())
        .collect()
}

/// Magnitude response of `h` at `freq` Hz.
pub fn gain_at(h: &[f64], freq: f64, sfreq: f64) -> f64 {
    let w = 2.0 * PI * freq / sfreq;
    let (re, im) = h.iter().enumerate().fold((0.0, 0.0), |(re, im), (k, &v)| {
        (re + v * (w * k as f64).cos(), im - v * (w * k as f64).sin())
    });
    re.hypot(im)
}
