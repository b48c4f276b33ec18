//! Ledger entries and the validation that guards their creation.

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::common::Amounted;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Rejection reasons for entry fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("amount must be greater than zero (got {0})")]
    NonPositiveAmount(Decimal),
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("unparseable amount `{0}`")]
    UnparseableAmount(String),
    #[error("unparseable date `{0}`")]
    UnparseableDate(String),
    #[error("unknown entry type `{0}` (expected expense or saving)")]
    UnknownKind(String),
}

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Expense,
    Saving,
}

impl EntryKind {
    pub const ALL: [EntryKind; 2] = [EntryKind::Expense, EntryKind::Saving];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Expense => "expense",
            EntryKind::Saving => "saving",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntryKind::Expense => "Expense",
            EntryKind::Saving => "Saving",
        };
        f.write_str(label)
    }
}

impl FromStr for EntryKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" => Ok(EntryKind::Expense),
            "saving" | "savings" => Ok(EntryKind::Saving),
            _ => Err(ValidationError::UnknownKind(s.to_string())),
        }
    }
}

/// Timezone-naive point in time carried by an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryTimestamp {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl EntryTimestamp {
    /// Calendar date used for bucketing and range filters.
    pub fn date(&self) -> NaiveDate {
        match self {
            EntryTimestamp::Date(date) => *date,
            EntryTimestamp::DateTime(moment) => moment.date(),
        }
    }

    /// Parses `YYYY-MM-DD` or an ISO-like date-time without offset.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Ok(EntryTimestamp::Date(date));
        }
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(EntryTimestamp::DateTime)
            .ok_or_else(|| ValidationError::UnparseableDate(raw.to_string()))
    }
}

impl fmt::Display for EntryTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryTimestamp::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            EntryTimestamp::DateTime(moment) => {
                write!(f, "{}", moment.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
        }
    }
}

impl From<NaiveDate> for EntryTimestamp {
    fn from(date: NaiveDate) -> Self {
        EntryTimestamp::Date(date)
    }
}

impl From<NaiveDateTime> for EntryTimestamp {
    fn from(moment: NaiveDateTime) -> Self {
        EntryTimestamp::DateTime(moment)
    }
}

/// How an entry is classified. Legacy ledgers only record the kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    TypeOnly(EntryKind),
    Categorized { kind: EntryKind, category: String },
}

impl Classification {
    pub fn kind(&self) -> EntryKind {
        match self {
            Classification::TypeOnly(kind) => *kind,
            Classification::Categorized { kind, .. } => *kind,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            Classification::TypeOnly(_) => None,
            Classification::Categorized { category, .. } => Some(category),
        }
    }
}

/// One immutable ledger record. Construct through [`EntryDraft::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    timestamp: EntryTimestamp,
    classification: Classification,
    amount: Decimal,
    notes: Option<String>,
}

impl Entry {
    pub fn timestamp(&self) -> EntryTimestamp {
        self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn kind(&self) -> EntryKind {
        self.classification.kind()
    }

    pub fn category(&self) -> Option<&str> {
        self.classification.category()
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

impl Amounted for Entry {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Unvalidated entry fields as supplied by a form, a CLI, or a stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub timestamp: EntryTimestamp,
    pub kind: EntryKind,
    pub category: Option<String>,
    pub amount: Decimal,
    pub notes: Option<String>,
}

impl EntryDraft {
    pub fn new(
        timestamp: impl Into<EntryTimestamp>,
        kind: EntryKind,
        amount: impl Into<Decimal>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            kind,
            category: None,
            amount: amount.into(),
            notes: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Checks every field and produces an [`Entry`].
    ///
    /// A category of `Some("")` (after trimming) is rejected; `None` yields a
    /// type-only entry.
    pub fn validate(self) -> Result<Entry, ValidationError> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(self.amount));
        }
        let classification = match self.category {
            None => Classification::TypeOnly(self.kind),
            Some(raw) => {
                let category = raw.trim();
                if category.is_empty() {
                    return Err(ValidationError::EmptyCategory);
                }
                Classification::Categorized {
                    kind: self.kind,
                    category: category.to_string(),
                }
            }
        };
        let notes = self
            .notes
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Ok(Entry {
            timestamp: self.timestamp,
            classification,
            amount: self.amount,
            notes,
        })
    }
}

/// Parses a textual amount such as `20`, `20.50` or ` 1e2 ` into an exact
/// decimal. `NaN` and infinities are reported as non-finite.
pub fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if let Ok(amount) = Decimal::from_str(trimmed) {
        return Ok(amount);
    }
    if let Ok(amount) = Decimal::from_scientific(trimmed) {
        return Ok(amount);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_finite() => Err(ValidationError::NonFiniteAmount),
        _ => Err(ValidationError::UnparseableAmount(raw.to_string())),
    }
}
