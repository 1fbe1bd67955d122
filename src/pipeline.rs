//! Per-recording pipeline.
//!
//! ```text
//! chbNN_MM.edf
//!   │
//!   ├─ edf::open_edf()          headers, duplicate labels → NAME-0, NAME-1
//!   ├─ fix_channel_names()      drop T8-P8-1, rename T8-P8-0 → T8-P8
//!   ├─ resolve whitelist        canonical order, missing channel → LoadError
//!   ├─ segment::classify()      interictal / preictal time ranges
//!   ├─ Recording::crop()        independent copy per segment
//!   └─ FeatureExtractor         band-pass, window, f32 × 1e6
//!        │
//!        └─→ RecordingWindows { interictal: Vec<[E, C, S]>, preictal: Vec<[E, C, S]> }
//! ```
use std::path::Path;

use ndarray::Array3;

use crate::config::DatasetConfig;
use crate::edf::open_edf;
use crate::error::{Error, Result};
use crate::features::FeatureExtractor;
use crate::recording::Recording;
use crate::segment::{classify, SeizureInterval, Segment};

/// Channel that some CHB-MIT files carry twice.
const DUPLICATED_CHANNEL: &str = "T8-P8";

/// Feature arrays of one recording, one array per segment (not merged).
#[derive(Debug, Clone, Default)]
pub struct RecordingWindows {
    pub interictal: Vec<Array3<f32>>,
    pub preictal:   Vec<Array3<f32>>,
}

impl RecordingWindows {
    /// Total interictal windows across all segments.
    pub fn interictal_windows(&self) -> usize {
        self.interictal.iter().map(|a| a.shape()[0]).sum()
    }

    /// Total preictal windows across all segments.
    pub fn preictal_windows(&self) -> usize {
        self.preictal.iter().map(|a| a.shape()[0]).sum()
    }
}

/// Apply the CHB-MIT naming fixup to disambiguated channel names.
///
/// If `T8-P8-1` is present it is dropped and `T8-P8-0` becomes `T8-P8`.
/// Returns `(signal index, name)` for every remaining channel.
pub fn fix_channel_names(names: &[String]) -> Vec<(usize, String)> {
    let second = format!("{DUPLICATED_CHANNEL}-1");
    let first = format!("{DUPLICATED_CHANNEL}-0");
    let has_duplicate = names.iter().any(|n| *n == second);

    names
        .iter()
        .enumerate()
        .filter(|(_, n)| !(has_duplicate && **n == second))
        .map(|(i, n)| {
            if has_duplicate && *n == first {
                (i, DUPLICATED_CHANNEL.to_string())
            } else {
                (i, n.clone())
            }
        })
        .collect()
}

/// Load `path` restricted to `channels`, in that order.
///
/// Fails with [`Error::Load`] if the file cannot be read, a channel is
/// missing, or the picked channels have different sampling rates.
pub fn load_recording(path: &Path, channels: &[String]) -> Result<Recording> {
    if channels.is_empty() {
        return Err(Error::load(path, "empty channel whitelist"));
    }
    let raw = open_edf(path)?;
    let available = fix_channel_names(&raw.ch_names);

    let mut picks = Vec::with_capacity(channels.len());
    let mut missing = Vec::new();
    for want in channels {
        match available.iter().find(|(_, name)| name == want) {
            Some(&(idx, _)) => picks.push(idx),
            None => missing.push(want.as_str()),
        }
    }
    if !missing.is_empty() {
        return Err(Error::load(path, format!("missing channels: {}", missing.join(", "))));
    }

    let sfreq = raw.sfreq(picks[0]);
    let data = raw.read_signals(&picks)?;
    tracing::debug!(
        path = %path.display(),
        n_chan = data.nrows(),
        n_times = data.ncols(),
        sfreq,
        "recording loaded"
    );
    Ok(Recording::new(channels.to_vec(), sfreq, data))
}

/// Run segmentation, windowing and extraction on a loaded recording.
///
/// Fails with [`Error::Config`] if the recording is sampled too slowly for
/// the configured band.
pub fn process(
    recording: &Recording,
    intervals: &[SeizureInterval],
    cfg: &DatasetConfig,
) -> Result<RecordingWindows> {
    let (interictal, preictal) = classify(intervals, cfg);
    let extractor = FeatureExtractor::from_config(cfg, recording.sfreq)?;

    let run = |segments: &[Segment]| -> Vec<Array3<f32>> {
        segments
            .iter()
            .map(|seg| {
                if seg.end > recording.duration_secs() + 1e-9 {
                    tracing::warn!(
                        start = seg.start,
                        end = seg.end,
                        duration = recording.duration_secs(),
                        "segment extends past the recording end, clamped"
                    );
                }
                extractor.extract(&recording.crop(seg.start, seg.end))
            })
            .collect()
    };

    Ok(RecordingWindows { interictal: run(&interictal), preictal: run(&preictal) })
}

/// Load the recording at `path` and turn it into labeled feature arrays.
pub fn process_recording(
    path: &Path,
    intervals: &[SeizureInterval],
    cfg: &DatasetConfig,
) -> Result<RecordingWindows> {
    let recording = load_recording(path, &cfg.useful_channels)?;
    if !(recording.sfreq > 2.0 * cfg.band_high_hz) {
        return Err(Error::load(
            path,
            format!(
                "sampled at {} Hz, too slow for a {} Hz band edge",
                recording.sfreq, cfg.band_high_hz
            ),
        ));
    }
    process(&recording, intervals, cfg)
}
