//! Pure ledger data types: entries, the ledger itself, and calendar periods.

pub mod common;
pub mod entry;
pub mod ledger;
pub mod period;

pub use common::Amounted;
pub use entry::{
    parse_amount, Classification, Entry, EntryDraft, EntryKind, EntryTimestamp, ValidationError,
};
pub use ledger::Ledger;
pub use period::{Bucket, DateRange, Granularity, ParseGranularityError, RangeError};
