//! Ledger Store: load a full snapshot, persist a full snapshot.

pub mod csv_backend;
pub mod json_backend;
pub mod record;

use std::path::{Path, PathBuf};

use crate::{config::StorageFormat, domain::Ledger, errors::LedgerError};

pub use csv_backend::CsvStore;
pub use json_backend::JsonStore;
pub use record::EntryRecord;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// A stored row that could not be turned into an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    /// 1-based position of the row in the stored snapshot.
    pub line: usize,
    pub reason: String,
}

/// Outcome of loading a snapshot. Rejected rows are excluded from the ledger.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub ledger: Ledger,
    pub rejected: Vec<RejectedRow>,
    pub path: PathBuf,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Abstraction over snapshot-style persistence backends.
///
/// Writes replace the whole collection; appends happen in memory first.
pub trait LedgerStore: Send + Sync {
    /// Reads the full snapshot. A missing file yields an empty ledger.
    fn load(&self) -> Result<LoadReport>;
    fn persist(&self, ledger: &Ledger) -> Result<()>;
    fn path(&self) -> &Path;
}

/// Opens the backend matching `format` at `path`.
pub fn open_store(format: StorageFormat, path: PathBuf) -> Box<dyn LedgerStore> {
    match format {
        StorageFormat::Json => Box::new(JsonStore::new(path)),
        StorageFormat::Csv => Box::new(CsvStore::new(path)),
    }
}
