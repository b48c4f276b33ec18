use chrono::{DateTime, Utc};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    core::utils::write_atomic,
    domain::{Entry, Ledger},
    errors::LedgerError,
};

use super::{record::EntryRecord, LedgerStore, LoadReport, RejectedRow, Result};

/// Stores the ledger as `date,category,type,amount,notes` rows with a header line.
///
/// CSV carries no snapshot metadata; timestamps come from the file's mtime.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LedgerStore for CsvStore {
    fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            return Ok(LoadReport {
                ledger: Ledger::new(),
                rejected: Vec::new(),
                path: self.path.clone(),
            });
        }
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers = reader.headers()?.clone();

        let mut entries = Vec::new();
        let mut rejected = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let line = index + 1;
            let parsed = result
                .map_err(|err| err.to_string())
                .and_then(|row| {
                    row.deserialize::<EntryRecord>(Some(&headers))
                        .map_err(|err| err.to_string())
                })
                .and_then(|record| Entry::try_from(record).map_err(|err| err.to_string()));
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!("skipping row {} in `{}`: {}", line, self.path.display(), reason);
                    rejected.push(RejectedRow { line, reason });
                }
            }
        }

        let modified: DateTime<Utc> = fs::metadata(&self.path)?
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        info!(
            "loaded {} entries from `{}` ({} rejected)",
            entries.len(),
            self.path.display(),
            rejected.len()
        );
        Ok(LoadReport {
            ledger: Ledger::from_entries(entries, modified, modified),
            rejected,
            path: self.path.clone(),
        })
    }

    fn persist(&self, ledger: &Ledger) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if ledger.is_empty() {
            writer.write_record(["date", "category", "type", "amount", "notes"])?;
        }
        for entry in ledger.entries() {
            writer.serialize(EntryRecord::from(entry))?;
        }
        let data = writer
            .into_inner()
            .map_err(|err| LedgerError::Persistence(err.to_string()))?;
        write_atomic(&self.path, &data)?;
        info!("persisted {} entries to `{}`", ledger.len(), self.path.display());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
