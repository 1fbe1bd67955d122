//! On-disk layout of the window store.
//!
//! ```text
//! "ICTALST1"                                   8-byte magic
//! record*:
//!   u64 LE  header length n (multiple of 8)
//!   n bytes JSON header, space padded          {"op", "path", "dtype", "shape"}
//!   payload little-endian f32, row-major       product(shape) × 4 bytes
//! ```
//!
//! Records are only ever appended.  A reader rebuilds the dataset tree by
//! replaying them in order; a growable dataset is the concatenation of its
//! `append` payloads along axis 0.
use ndarray::Array3;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const MAGIC: &[u8; 8] = b"ICTALST1";

/// Only element type written by the pipeline.
pub const DTYPE_F32: &str = "F32";

/// Operation recorded by one log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Declare an empty dataset growable along axis 0; `shape = [0, C, S]`.
    CreateGrowable,
    /// Add rows to a growable dataset; `shape = [rows, C, S]`.
    Append,
    /// Write a complete fixed-shape dataset.
    WriteFixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordHeader {
    pub op:    Op,
    pub path:  String,
    pub dtype: String,
    pub shape: Vec<usize>,
}

impl RecordHeader {
    pub fn new(op: Op, path: &str, shape: [usize; 3]) -> Self {
        Self { op, path: path.to_string(), dtype: DTYPE_F32.into(), shape: shape.to_vec() }
    }

    /// Payload size announced by this header.
    pub fn payload_len(&self) -> usize {
        match self.op {
            Op::CreateGrowable => 0,
            Op::Append | Op::WriteFixed => self.shape.iter().product::<usize>() * 4,
        }
    }

    /// Shape as `[rows, channels, samples]`.
    pub fn shape3(&self) -> Result<[usize; 3]> {
        match self.shape.as_slice() {
            &[a, b, c] => Ok([a, b, c]),
            other => Err(Error::Store(format!("{}: expected 3-D shape, got {other:?}", self.path))),
        }
    }
}

/// Serialize one record (length prefix, padded header, payload) into one buffer.
pub fn encode_record(header: &RecordHeader, payload: &[u8]) -> Result<Vec<u8>> {
    debug_assert_eq!(header.payload_len(), payload.len());
    let hdr_bytes = serde_json::to_vec(header)
        .map_err(|e| Error::Store(format!("encoding record header: {e}")))?;
    let pad = (8 - hdr_bytes.len() % 8) % 8;
    let hdr_len = hdr_bytes.len() + pad;

    let mut out = Vec::with_capacity(8 + hdr_len + payload.len());
    out.extend_from_slice(&(hdr_len as u64).to_le_bytes());
    out.extend_from_slice(&hdr_bytes);
    out.extend(std::iter::repeat(b' ').take(pad));
    out.extend_from_slice(payload);
    Ok(out)
}

/// Row-major little-endian bytes of `arr`.
pub fn f32_bytes(arr: &Array3<f32>) -> Vec<u8> {
    arr.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Decode little-endian f32 values.
pub fn f32_from_bytes(raw: &[u8]) -> Vec<f32> {
    raw.chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Dataset paths are `/`-separated, non-empty components.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() || path.split('/').any(str::is_empty) {
        return Err(Error::Store(format!("invalid dataset path '{path}'")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_header_is_padded() {
        let h = RecordHeader::new(Op::Append, "chb01/normal", [2, 3, 4]);
        let rec = encode_record(&h, &vec![0u8; 96]).unwrap();
        let n = u64::from_le_bytes(rec[..8].try_into().unwrap()) as usize;
        assert_eq!(n % 8, 0);
        assert_eq!(rec.len(), 8 + n + 96);
        let parsed: RecordHeader = serde_json::from_slice(&rec[8..8 + n]).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn op_names_are_snake_case() {
        let h = RecordHeader::new(Op::CreateGrowable, "p/normal", [0, 1, 1]);
        let json = serde_json::to_string(&h).unwrap();
        assert!(json.contains("\"create_growable\""), "{json}");
        assert_eq!(h.payload_len(), 0);
    }

    #[test]
    fn bad_paths_rejected() {
        assert!(validate_path("chb01/anomaly/0").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("chb01//normal").is_err());
        assert!(validate_path("/chb01").is_err());
    }
}
