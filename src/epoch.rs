//! Fixed-length, possibly overlapping epoching.
//!
//! Splits a continuous `[C, T]` signal into windows of `duration` samples
//! whose starts are `duration − overlap` samples apart, dropping any trailing
//! incomplete window:
//!
//! ```text
//! n_windows = floor((T − duration) / (duration − overlap)) + 1   if T ≥ duration
//!           = 0                                                 otherwise
//! ```
use std::ops::Range;

use ndarray::{s, Array2, Array3};

/// One window: `duration` samples starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub len:   usize,
}

impl Window {
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Chronological iterator over the windows of a span.
///
/// Cheap to clone; a clone restarts from the clone point, and calling
/// [`windows`] again restarts from the first window.
#[derive(Debug, Clone)]
pub struct Windows {
    next:      usize,
    remaining: usize,
    len:       usize,
    stride:    usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        if self.remaining == 0 {
            return None;
        }
        let w = Window { start: self.next, len: self.len };
        self.next += self.stride;
        self.remaining -= 1;
        Some(w)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Windows {}

/// Number of complete windows in a span of `n_samples`.
///
/// Zero when `duration` is zero or `overlap >= duration`.
pub fn window_count(n_samples: usize, duration: usize, overlap: usize) -> usize {
    if duration == 0 || overlap >= duration || n_samples < duration {
        return 0;
    }
    (n_samples - duration) / (duration - overlap) + 1
}

/// Windows of `duration` samples overlapping by `overlap` over `n_samples`.
pub fn windows(n_samples: usize, duration: usize, overlap: usize) -> Windows {
    Windows {
        next: 0,
        remaining: window_count(n_samples, duration, overlap),
        len: duration,
        stride: duration.saturating_sub(overlap),
    }
}

/// Copy each window of `data` (`[C, T]`) into a `[E, C, duration]` array.
pub fn epoch(data: &Array2<f32>, duration: usize, overlap: usize) -> Array3<f32> {
    let wins = windows(data.ncols(), duration, overlap);
    let mut out = Array3::<f32>::zeros((wins.len(), data.nrows(), duration));
    for (e, w) in wins.enumerate() {
        out.slice_mut(s![e, .., ..])
           .assign(&data.slice(s![.., w.range()]));
    }
    out
}
