use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

use crate::{
    core::utils::write_atomic,
    domain::{ledger::CURRENT_SCHEMA_VERSION, Entry, Ledger},
    errors::LedgerError,
};

use super::{record::EntryRecord, LedgerStore, LoadReport, RejectedRow, Result};

#[derive(Serialize)]
struct SnapshotOut<'a> {
    schema_version: u8,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    entries: &'a [EntryRecord],
}

/// Entries stay as raw values so one malformed row cannot fail the whole load.
#[derive(Deserialize)]
struct SnapshotIn {
    #[serde(default = "Ledger::schema_version_default")]
    schema_version: u8,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    entries: Vec<serde_json::Value>,
}

/// Stores the ledger as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LedgerStore for JsonStore {
    fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            return Ok(LoadReport {
                ledger: Ledger::new(),
                rejected: Vec::new(),
                path: self.path.clone(),
            });
        }
        let data = fs::read_to_string(&self.path)?;
        let snapshot: SnapshotIn = serde_json::from_str(&data)?;
        ensure_schema_support(snapshot.schema_version)?;

        let mut entries = Vec::with_capacity(snapshot.entries.len());
        let mut rejected = Vec::new();
        for (index, value) in snapshot.entries.into_iter().enumerate() {
            let line = index + 1;
            let parsed = serde_json::from_value::<EntryRecord>(value)
                .map_err(|err| err.to_string())
                .and_then(|record| Entry::try_from(record).map_err(|err| err.to_string()));
            match parsed {
                Ok(entry) => entries.push(entry),
                Err(reason) => {
                    warn!("skipping entry {} in `{}`: {}", line, self.path.display(), reason);
                    rejected.push(RejectedRow { line, reason });
                }
            }
        }

        let now = Utc::now();
        let created_at = snapshot.created_at.unwrap_or(now);
        let updated_at = snapshot.updated_at.unwrap_or(created_at);
        info!(
            "loaded {} entries from `{}` ({} rejected)",
            entries.len(),
            self.path.display(),
            rejected.len()
        );
        Ok(LoadReport {
            ledger: Ledger::from_entries(entries, created_at, updated_at),
            rejected,
            path: self.path.clone(),
        })
    }

    fn persist(&self, ledger: &Ledger) -> Result<()> {
        let records: Vec<EntryRecord> = ledger.entries().iter().map(EntryRecord::from).collect();
        let snapshot = SnapshotOut {
            schema_version: ledger.schema_version,
            created_at: ledger.created_at,
            updated_at: ledger.updated_at,
            entries: &records,
        };
        let json = serde_json::to_string_pretty(&snapshot)?;
        write_atomic(&self.path, json.as_bytes())?;
        info!("persisted {} entries to `{}`", records.len(), self.path.display());
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn ensure_schema_support(schema_version: u8) -> Result<()> {
    if schema_version > CURRENT_SCHEMA_VERSION {
        return Err(LedgerError::Persistence(format!(
            "ledger schema v{} is newer than supported v{}",
            schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}
