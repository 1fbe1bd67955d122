//! Append-only window store writer.
//!
//! One writer holds the file open for a whole dataset build.  Every operation
//! is encoded into a single buffer, written with one `write_all` and flushed,
//! so a crash can at worst leave one incomplete record at the tail; readers
//! skip it and a reopened writer truncates it away before appending.
//!
//! Growth strategy: exact fit.  An `append` adds one chunk holding exactly
//! the appended rows; nothing is preallocated or rewritten.
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use ndarray::Array3;

use super::format::{encode_record, f32_bytes, Op, RecordHeader, MAGIC};
use super::reader::{scan, DatasetKind, StoreIndex};
use crate::error::Result;

/// Writer for a window store file.
#[derive(Debug)]
pub struct StoreWriter {
    file:  File,
    path:  PathBuf,
    index: StoreIndex,
    /// Byte offset of the next record.
    end:   u64,
}

impl StoreWriter {
    /// Open `path` for appending, creating it if needed.
    ///
    /// Existing records are replayed so later operations are validated against
    /// them; an incomplete trailing record is cut off.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().read(true).write(true).create(true).truncate(false).open(path)?;
        let file_len = file.metadata()?.len();

        let (index, mut end) = scan(&mut BufReader::new(&file), file_len)?;
        if file_len == 0 {
            file.write_all(MAGIC)?;
            file.flush()?;
            end = MAGIC.len() as u64;
        } else if end < file_len {
            file.set_len(end)?;
        }
        file.seek(SeekFrom::Start(end))?;

        tracing::debug!(path = %path.display(), datasets = index.datasets.len(), "window store opened");
        Ok(Self { file, path: path.to_path_buf(), index, end })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current shape of a dataset, if it exists.
    pub fn shape(&self, path: &str) -> Option<[usize; 3]> {
        self.index.datasets.get(path).map(|e| e.shape())
    }

    pub fn kind(&self, path: &str) -> Option<DatasetKind> {
        self.index.datasets.get(path).map(|e| e.kind)
    }

    /// Declare an empty growable dataset with rows of shape `[channels, samples]`.
    pub fn create_growable(&mut self, path: &str, inner: [usize; 2]) -> Result<()> {
        let header = RecordHeader::new(Op::CreateGrowable, path, [0, inner[0], inner[1]]);
        self.commit(&header, &[])
    }

    /// Append rows to the growable dataset at `path`, creating it on first use.
    pub fn append(&mut self, path: &str, rows: &Array3<f32>) -> Result<()> {
        let (n, c, s) = rows.dim();
        if !self.index.datasets.contains_key(path) {
            self.create_growable(path, [c, s])?;
        }
        if n == 0 {
            return Ok(());
        }
        let header = RecordHeader::new(Op::Append, path, [n, c, s]);
        self.commit(&header, &f32_bytes(rows))
    }

    /// Write a new fixed-shape dataset.
    pub fn write_fixed(&mut self, path: &str, data: &Array3<f32>) -> Result<()> {
        let (n, c, s) = data.dim();
        let header = RecordHeader::new(Op::WriteFixed, path, [n, c, s]);
        self.commit(&header, &f32_bytes(data))
    }

    /// Flush and sync the file to disk.
    pub fn finish(mut self) -> Result<()> {
        self.file.flush()?;
        self.file.sync_all()?;
        Ok(())
    }

    fn commit(&mut self, header: &RecordHeader, payload: &[u8]) -> Result<()> {
        self.index.check(header)?;
        let record = encode_record(header, payload)?;
        self.file.write_all(&record)?;
        self.file.flush()?;

        let payload_at = self.end + (record.len() - payload.len()) as u64;
        self.index.apply(header, payload_at)?;
        self.end += record.len() as u64;
        Ok(())
    }
}
