#![doc(test(attr(deny(warnings))))]

//! Tally Core keeps a personal ledger of expenses and savings and summarizes
//! it over daily, weekly, monthly and yearly buckets.

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::{aggregate, Clock, GroupBy, SummaryTable, ViewRequest};
pub use crate::domain::{Entry, EntryDraft, EntryKind, Granularity, Ledger};
pub use crate::storage::LedgerStore;

/// Initializes global tracing. Safe to call more than once.
pub fn init() {
    utils::init_tracing();
}
