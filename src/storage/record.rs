use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Amounted, Entry, EntryDraft, EntryKind, EntryTimestamp, ValidationError};

/// Flat persisted form of an entry: `date, category, type, amount, notes`.
///
/// Type-only entries store an empty category. Legacy rows that put
/// `expense`/`saving` in `category` and leave `type` blank are read as
/// type-only entries. Amounts are written as decimal text and read from
/// either text or a plain number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub amount: Decimal,
    #[serde(default)]
    pub notes: String,
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            date: entry.timestamp().to_string(),
            category: entry.category().unwrap_or_default().to_string(),
            kind: entry.kind().as_str().to_string(),
            amount: entry.amount(),
            notes: entry.notes().unwrap_or_default().to_string(),
        }
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = ValidationError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let timestamp = EntryTimestamp::parse(&record.date)?;
        let category = record.category.trim();
        let (kind, category) = if record.kind.trim().is_empty() {
            (category.parse::<EntryKind>()?, None)
        } else {
            let kind = record.kind.parse::<EntryKind>()?;
            let category = (!category.is_empty()).then(|| category.to_string());
            (kind, category)
        };
        let mut draft = EntryDraft::new(timestamp, kind, record.amount);
        draft.category = category;
        if !record.notes.trim().is_empty() {
            draft.notes = Some(record.notes);
        }
        draft.validate()
    }
}
