//! Slices metadata: patient → recording → annotated intervals.
//!
//! ```json
//! {
//!   "chb01": {
//!     "chb01_03.edf": [[0, 2996, true], [2996, 3600, false]],
//!     "chb01_04.edf": [[0, 3600, false]]
//!   }
//! }
//! ```
//!
//! Patients and recordings are kept in sorted order, which is also the
//! processing order of a dataset build.
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};
use crate::segment::SeizureInterval;

/// Intervals of every recording of one patient.
pub type PatientSlices = BTreeMap<String, Vec<SeizureInterval>>;

/// Intervals of every recording of every patient.
pub type SlicesMetadata = BTreeMap<String, PatientSlices>;

/// Read and validate the slices metadata at `path`.
pub fn load_slices_metadata(path: &Path) -> Result<SlicesMetadata> {
    let bytes = std::fs::read(path).map_err(|e| Error::metadata(path, e.to_string()))?;
    let slices: SlicesMetadata =
        serde_json::from_slice(&bytes).map_err(|e| Error::metadata(path, e.to_string()))?;

    for (patient, recordings) in &slices {
        for (recording, intervals) in recordings {
            validate_intervals(intervals).map_err(|msg| {
                Error::metadata(path, format!("{patient}/{recording}: {msg}"))
            })?;
        }
    }
    Ok(slices)
}

/// Intervals must be finite, non-empty, non-negative and ordered without overlap.
pub fn validate_intervals(intervals: &[SeizureInterval]) -> std::result::Result<(), String> {
    let mut prev_end = 0.0_f64;
    for (i, iv) in intervals.iter().enumerate() {
        if !iv.start.is_finite() || !iv.end.is_finite() {
            return Err(format!("interval {i} is not finite"));
        }
        if iv.start < 0.0 {
            return Err(format!("interval {i} starts before the recording ({})", iv.start));
        }
        if iv.end <= iv.start {
            return Err(format!("interval {i} is empty or reversed ({}, {})", iv.start, iv.end));
        }
        if iv.start < prev_end {
            return Err(format!("interval {i} overlaps the previous one ({} < {prev_end})", iv.start));
        }
        prev_end = iv.end;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, body: &str) -> std::path::PathBuf {
        let p = dir.join("slices.json");
        std::fs::write(&p, body).unwrap();
        p
    }

    #[test]
    fn parses_nested_triples() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(
            dir.path(),
            r#"{"chb02": {"chb02_16.edf": [[0, 130, true]]},
                "chb01": {"chb01_04.edf": [[0, 3600, false]], "chb01_03.edf": [[0, 2996, true], [2996, 3600, false]]}}"#,
        );
        let slices = load_slices_metadata(&p).unwrap();
        let patients: Vec<_> = slices.keys().cloned().collect();
        assert_eq!(patients, vec!["chb01", "chb02"]);
        let recs: Vec<_> = slices["chb01"].keys().cloned().collect();
        assert_eq!(recs, vec!["chb01_03.edf", "chb01_04.edf"]);
        assert!(slices["chb01"]["chb01_03.edf"][0].contains_seizure);
    }

    #[test]
    fn missing_file_is_metadata_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_slices_metadata(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Metadata { .. }));
    }

    #[test]
    fn malformed_triple_is_metadata_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), r#"{"chb01": {"a.edf": [[0, 10]]}}"#);
        assert!(matches!(load_slices_metadata(&p), Err(Error::Metadata { .. })));
    }

    #[test]
    fn overlapping_intervals_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = write(dir.path(), r#"{"chb01": {"a.edf": [[0, 10, false], [5, 20, true]]}}"#);
        let err = load_slices_metadata(&p).unwrap_err();
        assert!(err.to_string().contains("overlaps"), "{err}");
    }
}
