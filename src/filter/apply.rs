//! Zero-phase FIR application by FFT overlap-add.
//!
//! ```text
//! x ─ odd-reflect pad N−1 each side ─ blocks of n_fft − N + 1 ─ FFT × H ─ IFFT
//!   ─ add into output advanced by (N−1)/2 ─ strip padding ─ y
//! ```
//!
//! Block size selection and padding follow MNE's overlap-add filter, so the
//! output has no group delay and no hard-edge transient.
use std::sync::Arc;

use ndarray::{Array2, ArrayView1};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// An FIR kernel planned for overlap-add filtering at one FFT block size.
///
/// Plans and buffers are reused across calls, so one instance serves every
/// channel of a segment.
pub struct OverlapAdd {
    n_taps:  usize,
    n_fft:   usize,
    /// Kernel spectrum, pre-scaled by `1 / n_fft`.
    kernel:  Vec<Complex<f64>>,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    block:   Vec<Complex<f64>>,
    scratch: Vec<Complex<f64>>,
}

impl OverlapAdd {
    /// Plan `h` (odd length) for signals of about `n_signal` samples.
    ///
    /// An empty `h` is treated as the identity kernel.
    pub fn new(h: &[f64], n_signal: usize) -> Self {
        let h: &[f64] = if h.is_empty() { &[1.0] } else { h };
        let n_taps = h.len();
        let n_fft = block_len(n_taps, n_signal + 2 * (n_taps - 1));

        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(n_fft);
        let inverse = planner.plan_fft_inverse(n_fft);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let mut scratch = vec![Complex::default(); scratch_len];

        let mut kernel: Vec<Complex<f64>> = h
            .iter()
            .map(|&v| Complex::new(v, 0.0))
            .chain(std::iter::repeat(Complex::default()))
            .take(n_fft)
            .collect();
        forward.process_with_scratch(&mut kernel, &mut scratch);
        let norm = 1.0 / n_fft as f64;
        kernel.iter_mut().for_each(|k| *k *= norm);

        Self {
            n_taps,
            n_fft,
            kernel,
            forward,
            inverse,
            block: vec![Complex::default(); n_fft],
            scratch,
        }
    }

    pub fn n_fft(&self) -> usize {
        self.n_fft
    }

    /// Filter `x`; the result has the same length.
    pub fn filter(&mut self, x: &[f64]) -> Vec<f64> {
        if x.is_empty() {
            return Vec::new();
        }
        let edge = self.n_taps - 1;
        let delay = edge / 2;
        let padded = reflect_limited_pad(x, edge);
        let n_ext = padded.len();
        let step = self.n_fft - edge;
        let mut acc = vec![0.0_f64; n_ext];

        for start in (0..n_ext).step_by(step) {
            let stop = (start + step).min(n_ext);
            self.block.fill(Complex::default());
            for (b, &v) in self.block.iter_mut().zip(&padded[start..stop]) {
                b.re = v;
            }
            self.forward.process_with_scratch(&mut self.block, &mut self.scratch);
            for (b, &k) in self.block.iter_mut().zip(self.kernel.iter()) {
                *b *= k;
            }
            self.inverse.process_with_scratch(&mut self.block, &mut self.scratch);

            // Convolution sample `start + p` lands at output `start + p - delay`.
            let skip = delay.saturating_sub(start);
            let out0 = start + skip - delay;
            for (o, b) in acc[out0..].iter_mut().zip(&self.block[skip..]) {
                *o += b.re;
            }
        }
        acc[edge..edge + x.len()].to_vec()
    }
}

/// Filter every channel of `data` (`[C, T]`) in place with the zero-phase FIR `h`.
pub fn apply_fir_zero_phase(data: &mut Array2<f64>, h: &[f64]) {
    let mut fir = OverlapAdd::new(h, data.ncols());
    let mut row_buf = Vec::with_capacity(data.ncols());
    for mut row in data.rows_mut() {
        row_buf.clear();
        row_buf.extend(row.iter().copied());
        let filtered = fir.filter(&row_buf);
        row.assign(&ArrayView1::from(&filtered[..]));
    }
}

/// Filter one signal with the zero-phase FIR `h`.
pub fn filter_1d(x: &[f64], h: &[f64]) -> Vec<f64> {
    OverlapAdd::new(h, x.len()).filter(x)
}

/// Odd reflection of `x` around its end points, `n` samples on each side.
///
/// Padding beyond `x.len() - 1` samples is zero.
fn reflect_limited_pad(x: &[f64], n: usize) -> Vec<f64> {
    let len = x.len();
    let reach = n.min(len - 1);
    let (first, last) = (x[0], x[len - 1]);

    let mut out = vec![0.0; n - reach];
    out.reserve(len + n + reach);
    out.extend((1..=reach).rev().map(|i| 2.0 * first - x[i]));
    out.extend_from_slice(x);
    out.extend((1..=reach).map(|i| 2.0 * last - x[len - 1 - i]));
    out.resize(out.len() + n - reach, 0.0);
    out
}

/// Power-of-two block length minimising the overlap-add cost
/// `ceil(n_x / (n_fft - n_h + 1)) · n_fft · (log2 n_fft + 1) + 4e-5 · n_fft · n_x`.
fn block_len(n_h: usize, n_x: usize) -> usize {
    let min_fft = (2 * n_h - 1).next_power_of_two();
    let lo = min_fft.trailing_zeros();
    let hi = (n_x.next_power_of_two().trailing_zeros() + 1).max(lo);

    (lo..=hi)
        .map(|pow| {
            let n = 1_usize << pow;
            let blocks = n_x.div_ceil(n - n_h + 1) as f64;
            let cost = blocks * n as f64 * (pow as f64 + 1.0) + 4e-5 * n as f64 * n_x as f64;
            (n, cost)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(min_fft, |(n, _)| n)
}
