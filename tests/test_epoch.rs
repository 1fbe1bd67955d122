use ictal::{epoch, window_count, windows};
use ndarray::Array2;
use proptest::prelude::*;

#[test]
fn five_second_windows_at_256_hz() {
    // 1 h of 18 channels at 256 Hz, 5 s windows without overlap → 720 windows.
    assert_eq!(window_count(3600 * 256, 1280, 0), 720);
    // 50 % overlap → floor((921600 − 1280) / 640) + 1.
    assert_eq!(window_count(3600 * 256, 1280, 640), 1439);
}

#[test]
fn epoch_values_are_copied_in_order() {
    let data = Array2::from_shape_fn((2, 50), |(c, t)| (c * 1000 + t) as f32);
    let out = epoch(&data, 20, 5);
    assert_eq!(out.shape(), &[3, 2, 20]);
    for (e, w) in windows(50, 20, 5).enumerate() {
        for c in 0..2 {
            for (k, t) in w.range().enumerate() {
                assert_eq!(out[[e, c, k]], data[[c, t]]);
            }
        }
    }
}

proptest! {
    #[test]
    fn count_follows_closed_form(
        n in 0usize..20_000,
        duration in 1usize..2000,
        overlap_frac in 0.0f64..1.0,
    ) {
        let overlap = ((duration as f64 * overlap_frac) as usize).min(duration - 1);
        let expected = if n < duration { 0 } else { (n - duration) / (duration - overlap) + 1 };
        prop_assert_eq!(window_count(n, duration, overlap), expected);
        prop_assert_eq!(windows(n, duration, overlap).len(), expected);
    }

    #[test]
    fn windows_fit_and_advance_by_stride(
        n in 0usize..5000,
        duration in 1usize..500,
        overlap_frac in 0.0f64..1.0,
    ) {
        let overlap = ((duration as f64 * overlap_frac) as usize).min(duration - 1);
        let stride = duration - overlap;
        let all: Vec<_> = windows(n, duration, overlap).collect();
        for (i, w) in all.iter().enumerate() {
            prop_assert_eq!(w.start, i * stride);
            prop_assert_eq!(w.len, duration);
            prop_assert!(w.end() <= n);
        }
        // No room for one more window.
        if let Some(last) = all.last() {
            prop_assert!(last.start + stride + duration > n);
        }
    }
}
