//! Append-only persistence for computed GPAs.
//!
//! [`ResultStore`] is the seam the single-record path writes through.
//! [`CsvResultStore`] keeps results in a CSV file with an `id,student_name,gpa`
//! header; [`MemoryResultStore`] keeps them in memory for tests and dry runs.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;
use csv::WriterBuilder;

/// A result waiting to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResult {
    pub student_name: String,
    pub gpa: f64,
}

/// A persisted result with its assigned id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub id: u64,
    pub student_name: String,
    pub gpa: f64,
}

/// Append-only sink for results. Ids start at 1 and increase by one per append.
pub trait ResultStore {
    fn append(&mut self, record: NewResult) -> Result<u64, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryResultStore {
    records: Vec<StoredResult>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StoredResult] {
        &self.records
    }
}

impl ResultStore for MemoryResultStore {
    fn append(&mut self, record: NewResult) -> Result<u64, StoreError> {
        let id = self.records.len() as u64 + 1;
        self.records.push(StoredResult {
            id,
            student_name: record.student_name,
            gpa: record.gpa,
        });
        Ok(id)
    }
}

#[derive(Debug)]
pub struct CsvResultStore {
    path: PathBuf,
    next_id: u64,
}

impl CsvResultStore {
    /// Opens (without creating) the store at `path`, continuing after the highest stored id.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let last_id = last_stored_id(&path)?;

        debug!(path = %path.display(), last_id, "Result store opened");

        Ok(Self {
            path,
            next_id: last_id + 1,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every stored result in file order.
    pub fn records(&self) -> Result<Vec<StoredResult>, StoreError> {
        read_records(&self.path)
    }
}

impl ResultStore for CsvResultStore {
    /// Appends after the highest id currently in the file, so rows written
    /// through other handles since `open` are never reused.
    ///
    /// The file is not locked: two writers appending at the same instant can
    /// still collide, so keep one writer per file.
    fn append(&mut self, record: NewResult) -> Result<u64, StoreError> {
        let last_id = last_stored_id(&self.path)?;
        let id = self.next_id.max(last_id + 1);

        let needs_header = fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(needs_header) // only for a fresh file
            .from_writer(file);

        writer.serialize(StoredResult {
            id,
            student_name: record.student_name,
            gpa: record.gpa,
        })?;
        writer.flush()?;

        self.next_id = id + 1;
        debug!(path = %self.path.display(), id, "Result appended");

        Ok(id)
    }
}

fn last_stored_id(path: &Path) -> Result<u64, StoreError> {
    Ok(read_records(path)?.iter().map(|r| r.id).max().unwrap_or(0))
}

fn read_records(path: &Path) -> Result<Vec<StoredResult>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: StoredResult = result?;
        rows.push(record);
    }

    Ok(rows)
}
