#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tally_core::domain::{EntryDraft, EntryKind, Ledger};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// A fresh directory that outlives the calling test.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Two Food expenses in the week of 2024-01-01 and a Salary saving the week after.
pub fn weekly_ledger() -> Ledger {
    ledger_from(&[
        (day(2024, 1, 5), EntryKind::Expense, "Food", dec!(20)),
        (day(2024, 1, 7), EntryKind::Expense, "Food", dec!(5)),
        (day(2024, 1, 10), EntryKind::Saving, "Salary", dec!(100)),
    ])
}

pub fn ledger_from(rows: &[(NaiveDate, EntryKind, &str, Decimal)]) -> Ledger {
    let mut ledger = Ledger::new();
    for (date, kind, category, amount) in rows {
        ledger
            .append(EntryDraft::new(*date, *kind, *amount).with_category(*category))
            .expect("valid fixture entry");
    }
    ledger
}
