use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::common::sum_amounts;
use super::entry::{Entry, EntryDraft, EntryKind, ValidationError};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Insertion-ordered, append-only collection of entries.
#[derive(Debug, Clone)]
pub struct Ledger {
    entries: Vec<Entry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            entries: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Rebuilds a ledger from already-validated entries, e.g. a loaded snapshot.
    pub fn from_entries(
        entries: Vec<Entry>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entries,
            created_at,
            updated_at,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Validates `draft` and appends it, returning the new entry's position.
    /// On rejection the ledger is left untouched.
    pub fn append(&mut self, draft: EntryDraft) -> Result<usize, ValidationError> {
        let entry = draft.validate()?;
        Ok(self.push(entry))
    }

    pub fn push(&mut self, entry: Entry) -> usize {
        self.entries.push(entry);
        self.touch();
        self.entries.len() - 1
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when at least one entry lacks a category.
    pub fn has_type_only_entries(&self) -> bool {
        self.entries.iter().any(|entry| entry.category().is_none())
    }

    pub fn total_for(&self, kind: EntryKind) -> Decimal {
        sum_amounts(self.entries.iter().filter(|entry| entry.kind() == kind))
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
