//! Dataset builder: every patient, every recording, one window store.
//!
//! ```text
//! for patient in slices (sorted):
//!     n = 0
//!     for recording in patient (sorted), not discarded:
//!         windows = process_recording(DATASET_PATH/patient/recording)
//!         <patient>/normal      ← append concat(windows.interictal)
//!         <patient>/anomaly/n   ← each non-empty windows.preictal[i]; n += 1
//! ```
//!
//! The store is opened once for the whole run.  A failure aborts the build;
//! records already written (earlier patients and recordings) stay readable.
use std::path::Path;

use ndarray::{concatenate, Array3, ArrayView3, Axis};

use crate::config::DatasetConfig;
use crate::error::{Error, Result};
use crate::metadata::{load_slices_metadata, PatientSlices, SlicesMetadata};
use crate::pipeline::process_recording;
use crate::store::{anomaly_path, normal_path, StoreWriter};

/// Counts reported at the end of a build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub patients:        usize,
    pub recordings:      usize,
    /// Recordings skipped because they are listed in `DISCARDED_EDFS`.
    pub discarded:       usize,
    pub normal_windows:  usize,
    pub anomaly_entries: usize,
    pub anomaly_windows: usize,
}

/// Fail with [`Error::OutputConflict`] unless `dir` holds nothing but `expected`.
pub fn check_output_dir(dir: &Path, expected: &str) -> Result<()> {
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name != expected {
            found.push(name);
        }
    }
    if found.is_empty() {
        Ok(())
    } else {
        found.sort();
        Err(Error::OutputConflict {
            dir: dir.to_path_buf(),
            expected: expected.to_string(),
            found,
        })
    }
}

/// Run a complete dataset build as configured by `cfg`.
///
/// Checks the output directory, loads the slices metadata, opens the store
/// and processes every patient.
pub fn build(cfg: &DatasetConfig) -> Result<BuildSummary> {
    cfg.validate()?;
    std::fs::create_dir_all(&cfg.output_path)?;
    check_output_dir(&cfg.output_path, &cfg.slices_filename)?;

    let slices = load_slices_metadata(&cfg.slices_path())?;
    let mut store = StoreWriter::open(cfg.store_path())?;
    let summary = build_into(cfg, &slices, &mut store)?;
    store.finish()?;

    tracing::info!(
        patients = summary.patients,
        recordings = summary.recordings,
        discarded = summary.discarded,
        normal_windows = summary.normal_windows,
        anomaly_entries = summary.anomaly_entries,
        anomaly_windows = summary.anomaly_windows,
        store = %cfg.store_path().display(),
        "dataset build complete"
    );
    Ok(summary)
}

/// Process every patient of `slices` into `store`.
pub fn build_into(
    cfg: &DatasetConfig,
    slices: &SlicesMetadata,
    store: &mut StoreWriter,
) -> Result<BuildSummary> {
    let mut summary = BuildSummary::default();
    let n_patients = slices.len();
    for (i, (patient, recordings)) in slices.iter().enumerate() {
        let span = tracing::info_span!("patient", %patient);
        let _enter = span.enter();
        tracing::info!("patient {}/{n_patients}", i + 1);

        build_patient(cfg, patient, recordings, store, &mut summary)?;
        summary.patients += 1;
    }
    Ok(summary)
}

fn build_patient(
    cfg: &DatasetConfig,
    patient: &str,
    recordings: &PatientSlices,
    store: &mut StoreWriter,
    summary: &mut BuildSummary,
) -> Result<()> {
    let mut anomalies = 0usize;
    let n_recordings = recordings.len();

    for (j, (filename, intervals)) in recordings.iter().enumerate() {
        if cfg.discarded_edfs.iter().any(|d| d == filename) {
            tracing::info!(recording = %filename, "discarded, skipping");
            summary.discarded += 1;
            continue;
        }

        let path = cfg.dataset_path.join(patient).join(filename);
        let windows = process_recording(&path, intervals, cfg)?;

        let normal = concat_windows(&windows.interictal)?;
        if let Some(normal) = normal {
            store.append(&normal_path(patient), &normal)?;
            summary.normal_windows += normal.shape()[0];
        }

        for preictal in windows.preictal.iter().filter(|p| p.shape()[0] > 0) {
            store.write_fixed(&anomaly_path(patient, anomalies), preictal)?;
            anomalies += 1;
            summary.anomaly_entries += 1;
            summary.anomaly_windows += preictal.shape()[0];
        }

        summary.recordings += 1;
        tracing::info!(
            recording = %filename,
            interictal = windows.interictal_windows(),
            preictal = windows.preictal_windows(),
            "recording {}/{n_recordings} done",
            j + 1
        );
    }
    Ok(())
}

/// Concatenate per-segment arrays along the window axis; `None` if there are
/// no windows at all.
fn concat_windows(arrays: &[Array3<f32>]) -> Result<Option<Array3<f32>>> {
    let views: Vec<ArrayView3<f32>> = arrays
        .iter()
        .filter(|a| a.shape()[0] > 0)
        .map(|a| a.view())
        .collect();
    if views.is_empty() {
        return Ok(None);
    }
    concatenate(Axis(0), &views)
        .map(Some)
        .map_err(|e| Error::Store(format!("concatenating interictal windows: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_dir_with_only_metadata_passes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slices.json"), "{}").unwrap();
        check_output_dir(dir.path(), "slices.json").unwrap();
    }

    #[test]
    fn stray_file_is_output_conflict() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("slices.json"), "{}").unwrap();
        std::fs::write(dir.path().join("old.ictal"), "x").unwrap();
        match check_output_dir(dir.path(), "slices.json") {
            Err(Error::OutputConflict { found, .. }) => assert_eq!(found, vec!["old.ictal"]),
            other => panic!("expected OutputConflict, got {other:?}"),
        }
    }

    #[test]
    fn concat_skips_empty_segments() {
        let a = Array3::<f32>::ones((2, 3, 4));
        let b = Array3::<f32>::zeros((0, 3, 4));
        let c = Array3::<f32>::zeros((1, 3, 4));
        let out = concat_windows(&[a, b, c]).unwrap().unwrap();
        assert_eq!(out.dim(), (3, 3, 4));
        assert!(concat_windows(&[]).unwrap().is_none());
    }
}
