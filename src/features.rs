//! Window feature extraction.
//!
//! ```text
//! segment [C, T] f64 (volts)
//!   ├─ band-pass FIR (zero-phase, whole segment)   8–13 Hz by default
//!   ├─ cast to f32, × scale                         volts → microvolts
//!   └─ epoch                                        [E, C, window] f32
//! ```
//!
//! Filtering runs on the continuous segment before it is cut, so window
//! boundaries never see a filter edge transient.
use ndarray::Array3;

use crate::config::DatasetConfig;
use crate::epoch::{epoch, window_count};
use crate::error::{Error, Result};
use crate::filter::{apply_fir_zero_phase, design_bandpass};
use crate::recording::Recording;

/// Band-pass filter designed for one sampling rate.
#[derive(Debug, Clone)]
pub struct BandPass {
    pub l_freq: f64,
    pub h_freq: f64,
    pub sfreq:  f64,
    taps: Vec<f64>,
}

impl BandPass {
    /// Design the band for `sfreq`.
    ///
    /// The upper edge must sit strictly below the Nyquist frequency, otherwise
    /// there is no room for its transition band.
    pub fn new(l_freq: f64, h_freq: f64, sfreq: f64) -> Result<Self> {
        if !(sfreq > 2.0 * h_freq) {
            return Err(Error::config(
                "BAND_HIGH_HZ",
                format!("{h_freq} Hz is not below the Nyquist frequency of {} Hz", sfreq / 2.0),
            ));
        }
        Ok(Self { l_freq, h_freq, sfreq, taps: design_bandpass(l_freq, h_freq, sfreq) })
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }
}

/// Turns recording segments into `[windows, channels, samples]` feature arrays.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    pub band:     BandPass,
    /// Window length in samples.
    pub duration: usize,
    /// Overlap between consecutive windows in samples.
    pub overlap:  usize,
    pub scale:    f32,
}

impl FeatureExtractor {
    /// Extractor for recordings sampled at `sfreq`.
    pub fn from_config(cfg: &DatasetConfig, sfreq: f64) -> Result<Self> {
        Ok(Self {
            band: BandPass::new(cfg.band_low_hz, cfg.band_high_hz, sfreq)?,
            duration: cfg.window_samples(sfreq),
            overlap: cfg.overlap_samples(sfreq),
            scale: cfg.scale,
        })
    }

    /// Number of windows [`extract`](Self::extract) yields for `n_samples`.
    pub fn window_count(&self, n_samples: usize) -> usize {
        window_count(n_samples, self.duration, self.overlap)
    }

    /// Filter `segment`, cut it into windows and scale them.
    ///
    /// `segment` is not modified; the result owns its data.
    pub fn extract(&self, segment: &Recording) -> Array3<f32> {
        if self.window_count(segment.n_times()) == 0 {
            return Array3::zeros((0, segment.n_chan(), self.duration));
        }
        let mut data = segment.data.clone();
        apply_fir_zero_phase(&mut data, self.band.taps());
        let scale = self.scale;
        let scaled = data.mapv(|v| v as f32 * scale);
        epoch(&scaled, self.duration, self.overlap)
    }
}
