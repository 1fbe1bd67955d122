//! Window store reader.
//!
//! Replays the record log into an in-memory index of datasets and reads
//! their payloads on demand.  A trailing record cut short by a crash is
//! ignored, so everything written before it stays readable.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use ndarray::Array3;

use super::format::{f32_from_bytes, validate_path, Op, RecordHeader, DTYPE_F32, MAGIC};
use crate::error::{Error, Result};

/// Storage class of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    /// Resizable along axis 0.
    Growable,
    /// Written once with its final shape.
    Fixed,
}

/// Payload location of a run of rows.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Chunk {
    pub offset: u64,
    pub rows:   usize,
}

#[derive(Debug, Clone)]
pub(crate) struct DatasetEntry {
    pub kind:   DatasetKind,
    pub inner:  [usize; 2],
    pub rows:   usize,
    pub chunks: Vec<Chunk>,
}

impl DatasetEntry {
    pub fn shape(&self) -> [usize; 3] {
        [self.rows, self.inner[0], self.inner[1]]
    }
}

/// Dataset index rebuilt from (or kept in sync with) the record log.
#[derive(Debug, Clone, Default)]
pub(crate) struct StoreIndex {
    pub datasets: BTreeMap<String, DatasetEntry>,
}

impl StoreIndex {
    /// Check that `header` can be applied, without applying it.
    pub fn check(&self, header: &RecordHeader) -> Result<()> {
        validate_path(&header.path)?;
        if header.dtype != DTYPE_F32 {
            return Err(Error::Store(format!("{}: unsupported dtype {}", header.path, header.dtype)));
        }
        let [rows, c, s] = header.shape3()?;
        match (header.op, self.datasets.get(&header.path)) {
            (Op::CreateGrowable | Op::WriteFixed, Some(_)) => {
                Err(Error::Store(format!("dataset {} already exists", header.path)))
            }
            (Op::CreateGrowable | Op::WriteFixed, None) => self.check_hierarchy(&header.path),
            (Op::Append, None) => {
                Err(Error::Store(format!("append to missing dataset {}", header.path)))
            }
            (Op::Append, Some(entry)) if entry.kind != DatasetKind::Growable => {
                Err(Error::Store(format!("dataset {} is not growable", header.path)))
            }
            (Op::Append, Some(entry)) if entry.inner != [c, s] => Err(Error::Store(format!(
                "append of shape [{rows}, {c}, {s}] to {} with rows of shape {:?}",
                header.path, entry.inner
            ))),
            (Op::Append, Some(_)) => Ok(()),
        }
    }

    /// Apply a checked header whose payload starts at `offset`.
    pub fn apply(&mut self, header: &RecordHeader, offset: u64) -> Result<()> {
        self.check(header)?;
        let [rows, c, s] = header.shape3()?;
        match header.op {
            Op::CreateGrowable => {
                self.datasets.insert(header.path.clone(), DatasetEntry {
                    kind: DatasetKind::Growable,
                    inner: [c, s],
                    rows: 0,
                    chunks: vec![],
                });
            }
            Op::WriteFixed => {
                self.datasets.insert(header.path.clone(), DatasetEntry {
                    kind: DatasetKind::Fixed,
                    inner: [c, s],
                    rows,
                    chunks: vec![Chunk { offset, rows }],
                });
            }
            Op::Append => {
                if let Some(entry) = self.datasets.get_mut(&header.path) {
                    entry.rows += rows;
                    entry.chunks.push(Chunk { offset, rows });
                }
            }
        }
        Ok(())
    }

    /// A dataset may not sit at a group path, nor below another dataset.
    fn check_hierarchy(&self, path: &str) -> Result<()> {
        let as_group = format!("{path}/");
        for existing in self.datasets.keys() {
            if existing.starts_with(&as_group) || path.starts_with(&format!("{existing}/")) {
                return Err(Error::Store(format!("{path} conflicts with dataset {existing}")));
            }
        }
        Ok(())
    }
}

/// Replay the log of `reader`.  Returns the index and the byte length of the
/// valid prefix (everything up to the last complete record).
pub(crate) fn scan<R: Read + Seek>(reader: &mut R, file_len: u64) -> Result<(StoreIndex, u64)> {
    let mut index = StoreIndex::default();
    if file_len == 0 {
        return Ok((index, 0));
    }
    let mut magic = [0u8; 8];
    reader.read_exact(&mut magic).map_err(|_| Error::Store("file too short for magic".into()))?;
    if &magic != MAGIC {
        return Err(Error::Store("not a window store (bad magic)".into()));
    }

    let mut pos = MAGIC.len() as u64;
    loop {
        if pos == file_len {
            return Ok((index, pos));
        }
        if file_len - pos < 8 {
            return Ok(truncated(index, pos, file_len));
        }
        let mut len_buf = [0u8; 8];
        reader.read_exact(&mut len_buf)?;
        let hdr_len = u64::from_le_bytes(len_buf);
        if file_len - pos - 8 < hdr_len {
            return Ok(truncated(index, pos, file_len));
        }
        let mut hdr_buf = vec![0u8; hdr_len as usize];
        reader.read_exact(&mut hdr_buf)?;
        let header: RecordHeader = serde_json::from_slice(&hdr_buf)
            .map_err(|e| Error::Store(format!("record header at byte {pos}: {e}")))?;

        let payload_at = pos + 8 + hdr_len;
        let payload_len = header.payload_len() as u64;
        if file_len - payload_at < payload_len {
            return Ok(truncated(index, pos, file_len));
        }
        index.apply(&header, payload_at)?;
        reader.seek(SeekFrom::Start(payload_at + payload_len))?;
        pos = payload_at + payload_len;
    }
}

fn truncated(index: StoreIndex, valid: u64, file_len: u64) -> (StoreIndex, u64) {
    tracing::warn!(
        valid_bytes = valid,
        dropped_bytes = file_len - valid,
        "window store ends with an incomplete record; ignoring it"
    );
    (index, valid)
}

/// Read-only view of a window store file.
#[derive(Debug)]
pub struct StoreReader {
    path:      PathBuf,
    index:     StoreIndex,
    valid_len: u64,
}

impl StoreReader {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();
        let (index, valid_len) = scan(&mut BufReader::new(file), file_len)?;
        Ok(Self { path: path.to_path_buf(), index, valid_len })
    }

    /// Byte length of the complete records.
    pub fn valid_len(&self) -> u64 {
        self.valid_len
    }

    /// All dataset paths, sorted.
    pub fn datasets(&self) -> impl Iterator<Item = &str> {
        self.index.datasets.keys().map(String::as_str)
    }

    /// Immediate children (groups or datasets) of `group`; `""` is the root.
    pub fn children(&self, group: &str) -> Vec<String> {
        let prefix = if group.is_empty() { String::new() } else { format!("{group}/") };
        let mut out: Vec<String> = self
            .index
            .datasets
            .keys()
            .filter_map(|p| p.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .map(String::from)
            .collect();
        out.dedup();
        out
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index.datasets.contains_key(path)
    }

    pub fn shape(&self, path: &str) -> Option<[usize; 3]> {
        self.index.datasets.get(path).map(DatasetEntry::shape)
    }

    pub fn kind(&self, path: &str) -> Option<DatasetKind> {
        self.index.datasets.get(path).map(|e| e.kind)
    }

    /// Read a whole dataset.
    pub fn read(&self, path: &str) -> Result<Array3<f32>> {
        let entry = self
            .index
            .datasets
            .get(path)
            .ok_or_else(|| Error::Store(format!("no dataset {path}")))?;
        let [c, s] = entry.inner;
        let mut values = Vec::with_capacity(entry.rows * c * s);

        let mut reader = BufReader::new(File::open(&self.path)?);
        for chunk in &entry.chunks {
            let mut raw = vec![0u8; chunk.rows * c * s * 4];
            reader.seek(SeekFrom::Start(chunk.offset))?;
            reader.read_exact(&mut raw)?;
            values.extend(f32_from_bytes(&raw));
        }
        Array3::from_shape_vec((entry.rows, c, s), values)
            .map_err(|e| Error::Store(format!("{path}: {e}")))
    }
}
