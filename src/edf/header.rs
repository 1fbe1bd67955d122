//! EDF/EDF+ header records.
//!
//! Fixed 256-byte file header followed by `ns × 256` bytes of signal headers,
//! all fields space-padded ASCII:
//! ```text
//!   8  version            80  patient id        80  recording id
//!   8  start date          8  start time         8  header bytes
//!  44  reserved            8  n data records     8  record duration (s)
//!   4  n signals
//! per signal (field-major: all labels, then all transducers, …):
//!  16  label              80  transducer         8  physical dimension
//!   8  physical min        8  physical max       8  digital min
//!   8  digital max        80  prefiltering       8  samples per record
//!  32  reserved
//! ```
use std::io::{self, Read};
use std::str::FromStr;

/// File-level header.
#[derive(Debug, Clone)]
pub struct EdfHeader {
    pub version:         String,
    pub patient_id:      String,
    pub recording_id:    String,
    pub start_date:      String,
    pub start_time:      String,
    pub header_bytes:    usize,
    pub reserved:        String,
    /// `-1` when the writer did not know the count; resolved from file size.
    pub n_records:       i64,
    pub record_duration: f64,
    pub n_signals:       usize,
}

impl EdfHeader {
    /// `true` for EDF+ files (reserved field starts with `EDF+C` / `EDF+D`).
    pub fn is_edf_plus(&self) -> bool {
        self.reserved.starts_with("EDF+")
    }
}

/// Per-signal header.
#[derive(Debug, Clone)]
pub struct SignalHeader {
    pub label:              String,
    pub transducer:         String,
    pub physical_dimension: String,
    pub physical_min:       f64,
    pub physical_max:       f64,
    pub digital_min:        i32,
    pub digital_max:        i32,
    pub prefiltering:       String,
    pub samples_per_record: usize,
}

impl SignalHeader {
    /// Physical units per digital step.
    #[inline]
    pub fn gain(&self) -> f64 {
        (self.physical_max - self.physical_min) / (self.digital_max - self.digital_min) as f64
    }

    /// Physical value of digital zero.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.physical_min - self.gain() * self.digital_min as f64
    }

    /// Multiplier from the declared physical dimension to volts.
    ///
    /// Unknown dimensions are left unscaled.
    pub fn volts_per_unit(&self) -> f64 {
        match self.physical_dimension.as_str() {
            "uV" | "µV" | "μV" | "uv" => 1e-6,
            "mV" | "mv" => 1e-3,
            "nV" | "nv" => 1e-9,
            _ => 1.0,
        }
    }

    /// Sampling rate in Hz given the record duration.
    #[inline]
    pub fn sfreq(&self, record_duration: f64) -> f64 {
        self.samples_per_record as f64 / record_duration
    }

    pub fn is_annotation(&self) -> bool {
        self.label == "EDF Annotations" || self.label == "BDF Annotations"
    }
}

/// Read the file header and all signal headers from the start of `reader`.
pub fn read_headers<R: Read>(reader: &mut R) -> io::Result<(EdfHeader, Vec<SignalHeader>)> {
    let version      = read_ascii(reader, 8)?;
    let patient_id   = read_ascii(reader, 80)?;
    let recording_id = read_ascii(reader, 80)?;
    let start_date   = read_ascii(reader, 8)?;
    let start_time   = read_ascii(reader, 8)?;
    let header_bytes = parse_field(&read_ascii(reader, 8)?, "header bytes")?;
    let reserved     = read_ascii(reader, 44)?;
    let n_records    = parse_field(&read_ascii(reader, 8)?, "number of data records")?;
    let record_duration: f64 = parse_field(&read_ascii(reader, 8)?, "data record duration")?;
    let n_signals: usize = parse_field(&read_ascii(reader, 4)?, "number of signals")?;

    if record_duration <= 0.0 {
        return Err(invalid(format!("non-positive data record duration {record_duration}")));
    }
    if header_bytes != 256 * (n_signals + 1) {
        return Err(invalid(format!(
            "header size {header_bytes} does not match {n_signals} signals"
        )));
    }

    let header = EdfHeader {
        version,
        patient_id,
        recording_id,
        start_date,
        start_time,
        header_bytes,
        reserved,
        n_records,
        record_duration,
        n_signals,
    };

    let labels       = read_column(reader, n_signals, 16)?;
    let transducers  = read_column(reader, n_signals, 80)?;
    let dimensions   = read_column(reader, n_signals, 8)?;
    let phys_min     = parse_column::<f64>(&read_column(reader, n_signals, 8)?, "physical minimum")?;
    let phys_max     = parse_column::<f64>(&read_column(reader, n_signals, 8)?, "physical maximum")?;
    let dig_min      = parse_column::<i32>(&read_column(reader, n_signals, 8)?, "digital minimum")?;
    let dig_max      = parse_column::<i32>(&read_column(reader, n_signals, 8)?, "digital maximum")?;
    let prefilters   = read_column(reader, n_signals, 80)?;
    let spr          = parse_column::<usize>(&read_column(reader, n_signals, 8)?, "samples per record")?;
    let _reserved    = read_column(reader, n_signals, 32)?;

    let mut signals = Vec::with_capacity(n_signals);
    for i in 0..n_signals {
        if dig_max[i] <= dig_min[i] {
            return Err(invalid(format!(
                "signal {} has digital max {} <= digital min {}",
                labels[i], dig_max[i], dig_min[i]
            )));
        }
        signals.push(SignalHeader {
            label:              labels[i].clone(),
            transducer:         transducers[i].clone(),
            physical_dimension: dimensions[i].clone(),
            physical_min:       phys_min[i],
            physical_max:       phys_max[i],
            digital_min:        dig_min[i],
            digital_max:        dig_max[i],
            prefiltering:       prefilters[i].clone(),
            samples_per_record: spr[i],
        });
    }
    Ok((header, signals))
}

/// Make duplicate labels unique by suffixing every occurrence with `-0`, `-1`, ….
///
/// `["A", "T8-P8", "T8-P8"]` → `["A", "T8-P8-0", "T8-P8-1"]`.
pub fn unique_channel_names(labels: &[String]) -> Vec<String> {
    let mut names = labels.to_vec();
    for label in labels {
        let dups: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, l)| *l == label)
            .map(|(i, _)| i)
            .collect();
        if dups.len() > 1 {
            for (n, &idx) in dups.iter().enumerate() {
                names[idx] = format!("{label}-{n}");
            }
        }
    }
    names
}

// ── Field helpers ────────────────────────────────────────────────────────

fn read_ascii<R: Read>(reader: &mut R, len: usize) -> io::Result<String> {
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).trim().to_string())
}

fn read_column<R: Read>(reader: &mut R, n: usize, len: usize) -> io::Result<Vec<String>> {
    (0..n).map(|_| read_ascii(reader, len)).collect()
}

fn parse_field<T: FromStr>(raw: &str, what: &str) -> io::Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| invalid(format!("invalid {what} '{raw}': {e}")))
}

fn parse_column<T: FromStr>(raw: &[String], what: &str) -> io::Result<Vec<T>>
where
    T::Err: std::fmt::Display,
{
    raw.iter().map(|s| parse_field(s, what)).collect()
}

fn invalid(message: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}
