//! Hierarchical, append-only window store.
//!
//! A single file holding `/`-separated dataset paths, e.g.
//!
//! ```text
//! chb01/normal          growable  [N, C, S]  all interictal windows of chb01
//! chb01/anomaly/0       fixed     [E, C, S]  first preictal segment
//! chb01/anomaly/1       fixed     [E, C, S]
//! chb02/normal          …
//! ```
//!
//! # Quick start
//! ```no_run
//! use ictal::store::{StoreReader, StoreWriter};
//! use ndarray::Array3;
//!
//! let mut w = StoreWriter::open("windows.ictal").unwrap();
//! w.append("chb01/normal", &Array3::<f32>::zeros((4, 18, 1280))).unwrap();
//! w.write_fixed("chb01/anomaly/0", &Array3::<f32>::zeros((2, 18, 1280))).unwrap();
//! w.finish().unwrap();
//!
//! let r = StoreReader::open("windows.ictal").unwrap();
//! assert_eq!(r.shape("chb01/normal"), Some([4, 18, 1280]));
//! ```
pub mod format;
pub mod reader;
pub mod writer;

pub use reader::{DatasetKind, StoreReader};
pub use writer::StoreWriter;

/// Path of a patient's growable interictal dataset.
pub fn normal_path(patient: &str) -> String {
    format!("{patient}/normal")
}

/// Group holding a patient's preictal datasets.
pub fn anomaly_group(patient: &str) -> String {
    format!("{patient}/anomaly")
}

/// Path of a patient's `n`-th preictal dataset.
pub fn anomaly_path(patient: &str, n: usize) -> String {
    format!("{patient}/anomaly/{n}")
}
