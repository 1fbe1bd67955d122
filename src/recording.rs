//! In-memory multi-channel recording.
//!
//! A [`Recording`] owns its `[C, T]` buffer.  Every slicing operation returns a
//! new owned buffer, so filtering one crop never touches another crop or the
//! source recording.
use ndarray::{s, Array2};

use crate::config::seconds_to_samples;

/// Continuous multi-channel signal with a fixed rate and channel order.
#[derive(Debug, Clone)]
pub struct Recording {
    /// Channel names, one per row of `data`.
    pub ch_names: Vec<String>,
    /// Sampling rate in Hz.
    pub sfreq: f64,
    /// `[C, T]` samples in volts.
    pub data: Array2<f64>,
}

impl Recording {
    pub fn new(ch_names: Vec<String>, sfreq: f64, data: Array2<f64>) -> Self {
        debug_assert_eq!(ch_names.len(), data.nrows());
        Self { ch_names, sfreq, data }
    }

    #[inline]
    pub fn n_chan(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn n_times(&self) -> usize {
        self.data.ncols()
    }

    /// Total duration in seconds.
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        self.n_times() as f64 / self.sfreq
    }

    /// Copy of the half-open time range `[tmin, tmax)` in seconds.
    ///
    /// Bounds are rounded to the nearest sample and clamped to the recording.
    pub fn crop(&self, tmin: f64, tmax: f64) -> Recording {
        let n = self.n_times();
        let start = seconds_to_samples(tmin, self.sfreq).min(n);
        let stop = seconds_to_samples(tmax, self.sfreq).clamp(start, n);
        Recording {
            ch_names: self.ch_names.clone(),
            sfreq: self.sfreq,
            data: self.data.slice(s![.., start..stop]).to_owned(),
        }
    }
}
