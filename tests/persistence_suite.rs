mod common;

use std::fs;

use common::{day, test_dir, weekly_ledger};
use tally_core::config::{Config, ConfigManager, StorageFormat};
use tally_core::core::services::EntryService;
use tally_core::core::{aggregate, GroupBy};
use tally_core::domain::{Classification, EntryDraft, EntryKind, Granularity, Ledger};
use tally_core::errors::LedgerError;
use tally_core::storage::{open_store, CsvStore, JsonStore, LedgerStore};
use rust_decimal_macros::dec;

#[test]
fn json_round_trip_preserves_entries_and_metadata() {
    let dir = test_dir();
    let store = JsonStore::new(dir.join("ledger.json"));
    let mut ledger = weekly_ledger();
    ledger
        .append(
            EntryDraft::new(day(2024, 1, 11), EntryKind::Expense, dec!(4.5))
                .with_category("Coffee")
                .with_notes("oat milk"),
        )
        .unwrap();
    store.persist(&ledger).unwrap();

    let report = store.load().unwrap();
    assert!(report.is_clean());
    assert_eq!(report.ledger.entries(), ledger.entries());
    assert_eq!(report.ledger.created_at, ledger.created_at);
    assert_eq!(report.ledger.entries()[3].notes(), Some("oat milk"));
}

#[test]
fn csv_round_trip_gives_the_same_summary() {
    let dir = test_dir();
    let store = CsvStore::new(dir.join("ledger.csv"));
    let ledger = weekly_ledger();
    store.persist(&ledger).unwrap();

    let reloaded = store.load().unwrap().ledger;
    let group_by = GroupBy::by_type_and_category();
    assert_eq!(
        aggregate(reloaded.entries(), Some(Granularity::Weekly), &group_by).unwrap(),
        aggregate(ledger.entries(), Some(Granularity::Weekly), &group_by).unwrap()
    );
}

#[test]
fn csv_bad_rows_are_reported_not_fatal() {
    let dir = test_dir();
    let path = dir.join("ledger.csv");
    fs::write(
        &path,
        "date,category,type,amount,notes\n\
         2024-01-05,Food,expense,20,\n\
         2024-01-06,Food,expense,abc,\n\
         2024-01-07,Food,expense,-5,\n\
         2024-13-01,Food,expense,5,\n\
         2024-01-08,Gift,income,5,\n\
         2024-01-09,Salary,saving,100,monthly\n",
    )
    .unwrap();

    let report = CsvStore::new(&path).load().unwrap();
    assert_eq!(report.ledger.len(), 2);
    let lines: Vec<usize> = report.rejected.iter().map(|row| row.line).collect();
    assert_eq!(lines, vec![2, 3, 4, 5]);
    assert_eq!(report.ledger.total_for(EntryKind::Saving), dec!(100));
}

#[test]
fn legacy_csv_without_type_column_loads_type_only_entries() {
    let dir = test_dir();
    let path = dir.join("legacy.csv");
    fs::write(
        &path,
        "date,category,amount\n2024-01-05,Expense,12.5\n2024-01-06,Savings,40\n",
    )
    .unwrap();

    let ledger = CsvStore::new(&path).load().unwrap().ledger;
    assert_eq!(ledger.len(), 2);
    assert!(ledger.has_type_only_entries());
    assert_eq!(
        ledger.entries()[1].classification(),
        &Classification::TypeOnly(EntryKind::Saving)
    );
    assert!(aggregate(ledger.entries(), None, &GroupBy::by_category()).is_err());
}

#[test]
fn json_entries_that_fail_validation_are_skipped() {
    let dir = test_dir();
    let path = dir.join("ledger.json");
    fs::write(
        &path,
        r#"{
  "schema_version": 1,
  "entries": [
    {"date": "2024-01-05", "category": "Food", "type": "expense", "amount": 20.0, "notes": ""},
    {"date": "2024-01-06", "category": "", "type": "expense", "amount": 0.0, "notes": ""},
    {"date": "yesterday", "category": "Food", "type": "expense", "amount": 3.0, "notes": ""}
  ]
}"#,
    )
    .unwrap();

    let report = JsonStore::new(&path).load().unwrap();
    assert_eq!(report.ledger.len(), 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].line, 2);
}

#[test]
fn newer_json_schema_is_refused() {
    let dir = test_dir();
    let path = dir.join("ledger.json");
    fs::write(&path, r#"{"schema_version": 99, "entries": []}"#).unwrap();
    let err = JsonStore::new(&path).load().unwrap_err();
    assert!(matches!(err, LedgerError::Persistence(_)));
}

#[test]
fn failed_save_keeps_previous_snapshot() {
    let dir = test_dir();
    let path = dir.join("ledger.json");
    let store = JsonStore::new(&path);
    let mut ledger = Ledger::new();
    EntryService::record_and_persist(
        &store,
        &mut ledger,
        EntryDraft::new(day(2024, 1, 5), EntryKind::Expense, 20).with_category("Food"),
    )
    .unwrap();
    let original = fs::read_to_string(&path).unwrap();

    // A directory at the staging path makes the write fail.
    fs::create_dir_all(dir.join("ledger.json.tmp")).unwrap();
    let result = EntryService::record_and_persist(
        &store,
        &mut ledger,
        EntryDraft::new(day(2024, 1, 6), EntryKind::Expense, 1).with_category("Food"),
    );
    assert!(result.is_err());
    assert_eq!(ledger.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn config_selects_the_backend_and_file() {
    let dir = test_dir();
    let manager = ConfigManager::with_base_dir(dir.clone()).unwrap();
    let config = Config {
        storage_format: StorageFormat::Csv,
        ..Config::default()
    };
    manager.save(&config).unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded, config);
    let path = manager.ledger_path(&loaded);
    assert_eq!(path, dir.join("ledger.csv"));

    let store = open_store(loaded.storage_format, path.clone());
    store.persist(&weekly_ledger()).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("date,category,type,amount,notes\n"));
}
