//! Decision threshold over anomaly scores.
//!
//! Scores (e.g. reconstruction errors of the window encoder) above the
//! threshold are classified as preictal.  The threshold is fitted with Otsu's
//! method on a 256-bin histogram, as `skimage.filters.threshold_otsu` does.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const OTSU_BINS: usize = 256;

/// A fitted (or not yet fitted) decision threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub value: Option<f32>,
}

impl Threshold {
    /// Threshold with a known value.
    pub fn new(value: f32) -> Self {
        Self { value: Some(value) }
    }

    /// Fit the threshold to `scores`.
    pub fn fit(&mut self, scores: &[f32]) -> Result<()> {
        self.value = Some(otsu(scores)?);
        Ok(())
    }

    /// `score > threshold` for every score.
    pub fn classify(&self, scores: &[f32]) -> Result<Vec<bool>> {
        let t = self
            .value
            .ok_or_else(|| Error::Threshold("threshold not fitted".into()))?;
        Ok(scores.iter().map(|&s| s > t).collect())
    }

    pub fn fit_classify(&mut self, scores: &[f32]) -> Result<Vec<bool>> {
        self.fit(scores)?;
        self.classify(scores)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| Error::Threshold(format!("encoding threshold: {e}")))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| Error::Threshold(format!("invalid threshold file {}: {e}", path.display())))
    }
}

/// Otsu threshold of `values`: the histogram bin centre maximising the
/// between-class variance.  Constant input returns that constant.
pub fn otsu(values: &[f32]) -> Result<f32> {
    let finite: Vec<f64> = values.iter().filter(|v| v.is_finite()).map(|&v| v as f64).collect();
    if finite.is_empty() {
        return Err(Error::Threshold("no finite scores to fit".into()));
    }
    let lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        return Ok(lo as f32);
    }

    let width = (hi - lo) / OTSU_BINS as f64;
    let mut hist = [0.0_f64; OTSU_BINS];
    for &v in &finite {
        let bin = (((v - lo) / width) as usize).min(OTSU_BINS - 1);
        hist[bin] += 1.0;
    }
    let centers: Vec<f64> = (0..OTSU_BINS).map(|i| lo + width * (i as f64 + 0.5)).collect();

    // Class weights and means for "≤ bin i" (w1, m1) and "> bin i" (w2, m2).
    let mut w1 = [0.0_f64; OTSU_BINS];
    let mut s1 = [0.0_f64; OTSU_BINS];
    let (mut w, mut s) = (0.0, 0.0);
    for i in 0..OTSU_BINS {
        w += hist[i];
        s += hist[i] * centers[i];
        w1[i] = w;
        s1[i] = s;
    }
    let (total_w, total_s) = (w, s);

    let mut best = (f64::NEG_INFINITY, 0usize);
    for i in 0..OTSU_BINS - 1 {
        let w2 = total_w - w1[i];
        if w1[i] == 0.0 || w2 == 0.0 {
            continue;
        }
        let m1 = s1[i] / w1[i];
        let m2 = (total_s - s1[i]) / w2;
        let between = w1[i] * w2 * (m1 - m2).powi(2);
        if between > best.0 {
            best = (between, i);
        }
    }
    Ok(centers[best.1] as f32)
}
