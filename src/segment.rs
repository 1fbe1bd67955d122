//! Interictal / preictal segmentation of a recording timeline.
//!
//! For every annotated interval `[start, end)`:
//!
//! ```text
//! no seizure:   |------------ interictal ------------|
//! seizure:      |-- interictal --|skip|-- preictal --|
//!               start     preictal_start            end
//! ```
//!
//! `preictal_start = max(start, end − preictal_seconds)`.  The preictal part is
//! trimmed at its start by `skip = (duration − overlap) mod stride` so it tiles
//! exactly into windows of `stride = window − overlap`.  The skipped gap is not
//! given back to the interictal part.
use serde::Deserialize;

use crate::config::DatasetConfig;

/// Slack for floating-point comparisons of times in seconds.
const TIME_EPS: f64 = 1e-9;

/// Label of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// Far from any seizure onset ("normal").
    Interictal,
    /// Immediately before a seizure onset ("anomaly").
    Preictal,
}

/// Half-open time range `[start, end)` in seconds from the recording start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub kind:  SegmentKind,
    pub start: f64,
    pub end:   f64,
}

impl Segment {
    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// One annotated interval of a recording, as stored in the slices metadata:
/// `[start, end, contains_seizure]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "(f64, f64, bool)")]
pub struct SeizureInterval {
    pub start: f64,
    pub end:   f64,
    /// The interval ends in (or contains) a seizure onset.
    pub contains_seizure: bool,
}

impl From<(f64, f64, bool)> for SeizureInterval {
    fn from((start, end, contains_seizure): (f64, f64, bool)) -> Self {
        Self { start, end, contains_seizure }
    }
}

/// Split annotated intervals into `(interictal, preictal)` segments.
///
/// Pure function of its inputs.  Preictal segments shorter than one window
/// are dropped since they cannot yield a window.
pub fn classify(intervals: &[SeizureInterval], cfg: &DatasetConfig) -> (Vec<Segment>, Vec<Segment>) {
    let mut interictal = Vec::new();
    let mut preictal = Vec::new();
    let stride = cfg.stride_seconds();

    for iv in intervals {
        if !iv.contains_seizure {
            interictal.push(Segment { kind: SegmentKind::Interictal, start: iv.start, end: iv.end });
            continue;
        }

        let preictal_start = iv.start.max(iv.end - cfg.preictal_seconds);
        let skip = preictal_skip(iv.end - preictal_start, cfg.window_overlap_seconds, stride);

        let seg = Segment { kind: SegmentKind::Preictal, start: preictal_start + skip, end: iv.end };
        if seg.duration() + TIME_EPS >= cfg.window_size_seconds {
            preictal.push(seg);
        } else {
            tracing::debug!(
                start = seg.start,
                end = seg.end,
                "preictal segment shorter than one window, dropped"
            );
        }

        if preictal_start > iv.start {
            interictal.push(Segment {
                kind: SegmentKind::Interictal,
                start: iv.start,
                end: preictal_start,
            });
        }
    }
    (interictal, preictal)
}

/// Seconds to trim from the start of a preictal range of `duration` so that
/// `duration − skip − overlap` is a multiple of `stride`.
pub fn preictal_skip(duration: f64, overlap: f64, stride: f64) -> f64 {
    let skip = (duration - overlap).rem_euclid(stride);
    if stride - skip < TIME_EPS { 0.0 } else { skip }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(preictal: f64, window: f64, overlap: f64) -> DatasetConfig {
        DatasetConfig {
            preictal_seconds: preictal,
            window_size_seconds: window,
            window_overlap_seconds: overlap,
            ..DatasetConfig::default()
        }
    }

    fn iv(start: f64, end: f64, contains_seizure: bool) -> SeizureInterval {
        SeizureInterval { start, end, contains_seizure }
    }

    #[test]
    fn normal_interval_is_one_interictal_segment() {
        let (inter, pre) = classify(&[iv(0.0, 100.0, false)], &cfg(50.0, 10.0, 0.0));
        assert_eq!(inter, vec![Segment { kind: SegmentKind::Interictal, start: 0.0, end: 100.0 }]);
        assert!(pre.is_empty());
    }

    #[test]
    fn seizure_interval_splits_at_lookback() {
        let (inter, pre) = classify(&[iv(0.0, 100.0, true)], &cfg(50.0, 10.0, 0.0));
        assert_eq!(pre, vec![Segment { kind: SegmentKind::Preictal, start: 50.0, end: 100.0 }]);
        assert_eq!(inter, vec![Segment { kind: SegmentKind::Interictal, start: 0.0, end: 50.0 }]);
    }

    #[test]
    fn short_seizure_interval_has_no_interictal_part() {
        let (inter, pre) = classify(&[iv(20.0, 60.0, true)], &cfg(50.0, 10.0, 0.0));
        assert!(inter.is_empty());
        assert_eq!(pre[0].start, 20.0);
    }

    #[test]
    fn skip_trims_preictal_start_only() {
        // duration 47, stride 10 → skip 7; interictal boundary stays at 53.
        let (inter, pre) = classify(&[iv(53.0, 100.0, true)], &cfg(47.0, 10.0, 0.0));
        assert!(inter.is_empty());
        assert_eq!(pre[0].start, 60.0);

        let (inter, pre) = classify(&[iv(0.0, 100.0, true)], &cfg(47.0, 10.0, 0.0));
        assert_eq!(inter[0].end, 53.0);
        assert_eq!(pre[0].start, 60.0);
    }

    #[test]
    fn skip_accounts_for_overlap() {
        // duration 50, overlap 5, stride 5 → (50 - 5) mod 5 = 0.
        assert_eq!(preictal_skip(50.0, 5.0, 5.0), 0.0);
        // duration 52, overlap 4, stride 6 → 48 mod 6 = 0.
        assert_eq!(preictal_skip(52.0, 4.0, 6.0), 0.0);
        // duration 53, overlap 4, stride 6 → 49 mod 6 = 1.
        assert_eq!(preictal_skip(53.0, 4.0, 6.0), 1.0);
    }

    #[test]
    fn too_short_preictal_is_dropped() {
        let (inter, pre) = classify(&[iv(0.0, 4.0, true)], &cfg(50.0, 10.0, 0.0));
        assert!(pre.is_empty());
        assert!(inter.is_empty());
    }

    #[test]
    fn interval_deserializes_from_triple() {
        let got: Vec<SeizureInterval> = serde_json::from_str("[[0, 12.5, false], [12.5, 40, true]]").unwrap();
        assert_eq!(got, vec![iv(0.0, 12.5, false), iv(12.5, 40.0, true)]);
    }
}
