//! EDF file format reader.
//!
//! Reads 16-bit EDF/EDF+ recordings such as the CHB-MIT scalp EEG database.
//!
//! # Quick start
//! ```no_run
//! use ictal::edf::open_edf;
//!
//! let raw = open_edf("chb01/chb01_03.edf").unwrap();
//! println!("{} signals, {} records", raw.signals.len(), raw.n_records);
//! let data = raw.read_signals(&[0, 1]).unwrap();  // [2, n_times] f64, volts
//! ```
pub mod header;
pub mod raw;

pub use header::{read_headers, unique_channel_names, EdfHeader, SignalHeader};
pub use raw::{open_edf, RawEdf};
