//! # ictal: seizure-onset window datasets from scalp EEG
//!
//! `ictal` turns continuous, interval-annotated EDF recordings (CHB-MIT
//! layout) into fixed-shape labeled windows for training a preictal anomaly
//! detector, and provides the decision threshold used to classify new
//! windows from their anomaly scores.
//!
//! ## Pipeline overview
//!
//! ```text
//! DATASET_PATH/chbNN/chbNN_MM.edf + OUTPUT_PATH/slices.json
//!   │
//!   ├─ edf::open_edf()          native EDF reader, duplicate labels disambiguated
//!   ├─ pipeline::load_recording T8-P8 fixup, channel whitelist in canonical order
//!   ├─ segment::classify()      interictal / preictal ranges (no leakage)
//!   ├─ Recording::crop()        independent copy per segment
//!   ├─ filter (FIR band-pass)   8–13 Hz, zero-phase, whole segment
//!   ├─ epoch                    fixed-length windows with overlap
//!   ├─ × 1e6                    volts → microvolts, f32
//!   └─ dataset::build()         chbNN/normal (growable), chbNN/anomaly/<n> (fixed)
//!        │
//!        └─→ OUTPUT_PATH/<STORE_FILENAME>   single append-only window store
//! ```
//!
//! ## Quick start
//!
//! ```no_run
//! use ictal::{build, DatasetConfig};
//!
//! let cfg = DatasetConfig::from_env().unwrap();
//! let summary = build(&cfg).unwrap();
//! println!("{} normal windows, {} preictal segments",
//!     summary.normal_windows, summary.anomaly_entries);
//! ```
//!
//! ## Running individual steps
//!
//! ```no_run
//! use ictal::{classify, process, load_recording, DatasetConfig, SeizureInterval};
//! use std::path::Path;
//!
//! let cfg = DatasetConfig {
//!     preictal_seconds: 1800.0,
//!     window_size_seconds: 5.0,
//!     ..DatasetConfig::default()
//! };
//! let intervals = [SeizureInterval { start: 0.0, end: 2996.0, contains_seizure: true }];
//!
//! let (interictal, preictal) = classify(&intervals, &cfg);
//! let rec = load_recording(Path::new("chb01/chb01_03.edf"), &cfg.useful_channels).unwrap();
//! let windows = process(&rec, &intervals, &cfg).unwrap();
//! assert_eq!(windows.preictal.len(), preictal.len());
//! # let _ = interictal;
//! ```

pub mod config;
pub mod dataset;
pub mod edf;
pub mod epoch;
pub mod error;
pub mod features;
pub mod filter;
pub mod metadata;
pub mod pipeline;
pub mod recording;
pub mod segment;
pub mod store;
pub mod threshold;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config + errors
pub use config::{DatasetConfig, CHB_MIT_CHANNELS};
pub use error::{Error, Result};

// edf
pub use edf::{open_edf, EdfHeader, RawEdf, SignalHeader};

// segmentation + windowing
pub use epoch::{epoch, window_count, windows, Window, Windows};
pub use segment::{classify, SeizureInterval, Segment, SegmentKind};

// filtering + features
pub use features::{BandPass, FeatureExtractor};
pub use filter::{apply_fir_zero_phase, design_bandpass, filter_1d};

// per-recording pipeline
pub use pipeline::{fix_channel_names, load_recording, process, process_recording, RecordingWindows};
pub use recording::Recording;

// dataset build + storage
pub use dataset::{build, build_into, check_output_dir, BuildSummary};
pub use metadata::{load_slices_metadata, SlicesMetadata};
pub use store::{DatasetKind, StoreReader, StoreWriter};

// decision threshold
pub use threshold::Threshold;
