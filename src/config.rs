//! Dataset build configuration.
//!
//! [`DatasetConfig`] holds every tunable parameter of the dataset build.  It is
//! constructed once (from the environment in the binaries, by hand in tests)
//! and passed by reference into every component; nothing reads global state.
use std::path::PathBuf;

use crate::error::{Error, Result};

/// The 18 bipolar channels shared by every CHB-MIT recording, in canonical order.
pub const CHB_MIT_CHANNELS: [&str; 18] = [
    "FP1-F7", "F7-T7", "T7-P7", "P7-O1",
    "FP1-F3", "F3-C3", "C3-P3", "P3-O1",
    "FP2-F4", "F4-C4", "C4-P4", "P4-O2",
    "FP2-F8", "F8-T8", "T8-P8", "P8-O2",
    "FZ-CZ", "CZ-PZ",
];

/// Configuration for a dataset build.
///
/// All fields are `pub` so tests can use struct-update syntax:
///
/// ```
/// use ictal::DatasetConfig;
///
/// let cfg = DatasetConfig {
///     preictal_seconds: 50.0,
///     window_size_seconds: 10.0,
///     window_overlap_seconds: 0.0,
///     ..DatasetConfig::default()
/// };
/// assert_eq!(cfg.stride_seconds(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Look-back before the end of a seizure interval that counts as preictal.
    ///
    /// Env: `PREICTAL_SECONDS` (required).  Default: `3600.0` s.
    pub preictal_seconds: f64,

    /// Duration of one window.
    ///
    /// Env: `WINDOW_SIZE_SECONDS` (required).  Default: `5.0` s.
    pub window_size_seconds: f64,

    /// Overlap between consecutive windows of the same segment.
    ///
    /// Must be strictly smaller than [`window_size_seconds`](Self::window_size_seconds).
    ///
    /// Env: `WINDOW_OVERLAP_SECONDS` (required).  Default: `0.0` s.
    pub window_overlap_seconds: f64,

    /// Ordered channel whitelist; the output channel axis follows this order.
    ///
    /// Env: `USEFUL_CHANNELS`, comma-separated.  Default: [`CHB_MIT_CHANNELS`].
    pub useful_channels: Vec<String>,

    /// Recording file names skipped by the build.
    ///
    /// Env: `DISCARDED_EDFS`, comma-separated.  Default: `[]`.
    pub discarded_edfs: Vec<String>,

    /// Root of the `<patient>/<recording>.edf` tree.
    ///
    /// Env: `DATASET_PATH` (required).
    pub dataset_path: PathBuf,

    /// Directory holding the slices metadata and receiving the window store.
    ///
    /// Env: `OUTPUT_PATH` (required).
    pub output_path: PathBuf,

    /// File name of the slices metadata inside `output_path`.
    ///
    /// Env: `SLICES_FILENAME` (required).
    pub slices_filename: String,

    /// File name of the window store inside `output_path`.
    ///
    /// Env: `STORE_FILENAME` (required).
    pub store_filename: String,

    /// Lower edge of the band-pass filter.
    ///
    /// Env: `BAND_LOW_HZ`.  Default: `8.0` Hz (alpha band).
    pub band_low_hz: f64,

    /// Upper edge of the band-pass filter.
    ///
    /// Env: `BAND_HIGH_HZ`.  Default: `13.0` Hz (alpha band).
    pub band_high_hz: f64,

    /// Multiplier applied after the f32 cast.  `1e6` turns volts into microvolts.
    pub scale: f32,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            preictal_seconds: 3600.0,
            window_size_seconds: 5.0,
            window_overlap_seconds: 0.0,
            useful_channels: CHB_MIT_CHANNELS.iter().map(|s| s.to_string()).collect(),
            discarded_edfs: vec![],
            dataset_path: PathBuf::from("data/chb-mit"),
            output_path: PathBuf::from("output"),
            slices_filename: "slices.json".into(),
            store_filename: "windows.ictal".into(),
            band_low_hz: 8.0,
            band_high_hz: 13.0,
            scale: 1e6,
        }
    }
}

impl DatasetConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Required keys that are absent yield [`Error::Config`]; optional keys
    /// fall back to [`DatasetConfig::default`].  The result is validated.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| Error::config(key, "not set"))
        };
        let number = |key: &str, raw: String| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| Error::config(key, format!("'{raw}' is not a number: {e}")))
        };
        let defaults = Self::default();

        let preictal_seconds = number("PREICTAL_SECONDS", required("PREICTAL_SECONDS")?)?;
        let window_size_seconds = number("WINDOW_SIZE_SECONDS", required("WINDOW_SIZE_SECONDS")?)?;
        let window_overlap_seconds =
            number("WINDOW_OVERLAP_SECONDS", required("WINDOW_OVERLAP_SECONDS")?)?;

        let band_low_hz = match lookup("BAND_LOW_HZ") {
            Some(raw) => number("BAND_LOW_HZ", raw)?,
            None => defaults.band_low_hz,
        };
        let band_high_hz = match lookup("BAND_HIGH_HZ") {
            Some(raw) => number("BAND_HIGH_HZ", raw)?,
            None => defaults.band_high_hz,
        };

        let cfg = Self {
            preictal_seconds,
            window_size_seconds,
            window_overlap_seconds,
            useful_channels: lookup("USEFUL_CHANNELS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.useful_channels),
            discarded_edfs: lookup("DISCARDED_EDFS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            dataset_path: PathBuf::from(required("DATASET_PATH")?),
            output_path: PathBuf::from(required("OUTPUT_PATH")?),
            slices_filename: required("SLICES_FILENAME")?,
            store_filename: required("STORE_FILENAME")?,
            band_low_hz,
            band_high_hz,
            scale: defaults.scale,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the numeric and channel settings for consistency.
    pub fn validate(&self) -> Result<()> {
        if !(self.preictal_seconds > 0.0) {
            return Err(Error::config("PREICTAL_SECONDS", "must be positive"));
        }
        if !(self.window_size_seconds > 0.0) {
            return Err(Error::config("WINDOW_SIZE_SECONDS", "must be positive"));
        }
        if !(self.window_overlap_seconds >= 0.0)
            || self.window_overlap_seconds >= self.window_size_seconds
        {
            return Err(Error::config(
                "WINDOW_OVERLAP_SECONDS",
                "must be in [0, WINDOW_SIZE_SECONDS)",
            ));
        }
        if !(self.band_low_hz > 0.0 && self.band_low_hz < self.band_high_hz) {
            return Err(Error::config("BAND_LOW_HZ", "band must satisfy 0 < low < high"));
        }
        if self.useful_channels.is_empty() {
            return Err(Error::config("USEFUL_CHANNELS", "channel whitelist is empty"));
        }
        for (i, ch) in self.useful_channels.iter().enumerate() {
            if self.useful_channels[..i].contains(ch) {
                return Err(Error::config("USEFUL_CHANNELS", format!("duplicate channel {ch}")));
            }
        }
        Ok(())
    }

    /// Distance between the starts of two consecutive windows.
    pub fn stride_seconds(&self) -> f64 {
        self.window_size_seconds - self.window_overlap_seconds
    }

    /// Samples per window at `sfreq`.
    pub fn window_samples(&self, sfreq: f64) -> usize {
        seconds_to_samples(self.window_size_seconds, sfreq)
    }

    /// Overlap in samples at `sfreq`.
    pub fn overlap_samples(&self, sfreq: f64) -> usize {
        seconds_to_samples(self.window_overlap_seconds, sfreq)
    }

    pub fn slices_path(&self) -> PathBuf {
        self.output_path.join(&self.slices_filename)
    }

    pub fn store_path(&self) -> PathBuf {
        self.output_path.join(&self.store_filename)
    }
}

/// Nearest sample index for a time in seconds.
pub fn seconds_to_samples(seconds: f64, sfreq: f64) -> usize {
    (seconds * sfreq).round().max(0.0) as usize
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
