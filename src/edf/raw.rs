//! Raw EDF data reader.
//!
//! # Algorithm
//! 1. Open the file and parse the file + signal headers.
//! 2. Resolve the number of complete data records from the file size.
//! 3. Disambiguate duplicate channel labels.
//! 4. On demand, walk every data record and decode only the requested signals.
//!
//! # Calibration
//! ```text
//! volts[ch, t] = (digital[t] × gain[ch] + offset[ch]) × volts_per_unit[ch]
//! ```
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use ndarray::Array2;

use super::header::{read_headers, unique_channel_names, EdfHeader, SignalHeader};
use crate::error::{Error, Result};

/// An opened EDF recording; sample data is read lazily.
#[derive(Debug, Clone)]
pub struct RawEdf {
    pub header:  EdfHeader,
    pub signals: Vec<SignalHeader>,
    /// Labels with duplicates suffixed (`T8-P8-0`, `T8-P8-1`).
    pub ch_names: Vec<String>,
    /// Complete data records available in the file.
    pub n_records: usize,
    /// File this was read from (for lazy reads).
    pub path: PathBuf,
}

impl RawEdf {
    /// Sampling rate of signal `idx` in Hz.
    #[inline]
    pub fn sfreq(&self, idx: usize) -> f64 {
        self.signals[idx].sfreq(self.header.record_duration)
    }

    /// Number of samples of signal `idx` across the whole file.
    #[inline]
    pub fn n_times(&self, idx: usize) -> usize {
        self.n_records * self.signals[idx].samples_per_record
    }

    /// Bytes in one data record (16-bit samples of every signal).
    fn record_bytes(&self) -> usize {
        self.signals.iter().map(|s| s.samples_per_record * 2).sum()
    }

    /// Read the signals at `picks`, in that order, as a `[picks.len(), T]`
    /// array in volts.
    ///
    /// All picked signals must share one sampling rate.
    pub fn read_signals(&self, picks: &[usize]) -> Result<Array2<f64>> {
        let Some(&first) = picks.first() else {
            return Ok(Array2::zeros((0, 0)));
        };
        let spr = self.signals[first].samples_per_record;
        if let Some(&bad) = picks.iter().find(|&&p| self.signals[p].samples_per_record != spr) {
            return Err(Error::load(
                &self.path,
                format!(
                    "channel {} is sampled at {} Hz, {} at {} Hz",
                    self.ch_names[bad],
                    self.sfreq(bad),
                    self.ch_names[first],
                    self.sfreq(first),
                ),
            ));
        }

        // Byte offset of each signal inside a record.
        let mut sig_offsets = Vec::with_capacity(self.signals.len());
        let mut acc = 0usize;
        for s in &self.signals {
            sig_offsets.push(acc);
            acc += s.samples_per_record * 2;
        }
        let cals: Vec<(f64, f64)> = picks
            .iter()
            .map(|&p| {
                let s = &self.signals[p];
                let unit = s.volts_per_unit();
                (s.gain() * unit, s.offset() * unit)
            })
            .collect();

        let file = File::open(&self.path).map_err(|e| Error::load(&self.path, e.to_string()))?;
        let mut reader = BufReader::new(file);
        reader
            .seek(SeekFrom::Start(self.header.header_bytes as u64))
            .map_err(|e| Error::load(&self.path, e.to_string()))?;

        let mut out = Array2::<f64>::zeros((picks.len(), self.n_records * spr));
        let mut record = vec![0u8; self.record_bytes()];
        for r in 0..self.n_records {
            reader
                .read_exact(&mut record)
                .map_err(|e| Error::load(&self.path, format!("data record {r}: {e}")))?;
            let t0 = r * spr;
            for (row, (&p, &(gain, offset))) in picks.iter().zip(cals.iter()).enumerate() {
                let bytes = &record[sig_offsets[p]..sig_offsets[p] + spr * 2];
                for (t, b) in bytes.chunks_exact(2).enumerate() {
                    let digital = i16::from_le_bytes([b[0], b[1]]) as f64;
                    out[[row, t0 + t]] = digital * gain + offset;
                }
            }
        }
        Ok(out)
    }
}

/// Open an EDF file and return a [`RawEdf`] without reading sample data.
pub fn open_edf<P: AsRef<Path>>(path: P) -> Result<RawEdf> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::load(path, e.to_string()))?;
    let file_len = file
        .metadata()
        .map_err(|e| Error::load(path, e.to_string()))?
        .len() as usize;
    let mut reader = BufReader::new(file);

    let (header, signals) =
        read_headers(&mut reader).map_err(|e| Error::load(path, format!("header: {e}")))?;

    let record_bytes: usize = signals.iter().map(|s| s.samples_per_record * 2).sum();
    if record_bytes == 0 {
        return Err(Error::load(path, "data records are empty"));
    }
    let available = file_len.saturating_sub(header.header_bytes) / record_bytes;
    let n_records = if header.n_records < 0 {
        available
    } else if (header.n_records as usize) > available {
        tracing::warn!(
            path = %path.display(),
            declared = header.n_records,
            available,
            "file is shorter than its header declares; reading complete records only"
        );
        available
    } else {
        header.n_records as usize
    };

    let labels: Vec<String> = signals.iter().map(|s| s.label.clone()).collect();
    let ch_names = unique_channel_names(&labels);

    Ok(RawEdf {
        header,
        signals,
        ch_names,
        n_records,
        path: path.to_path_buf(),
    })
}
