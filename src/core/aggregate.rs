//! Bucketed, grouped summation of ledger entries into a dense table.
//!
//! Every bucket observed in the input is crossed with every group tuple
//! observed in the input; combinations without entries are materialised as
//! zero rows. Amounts are exact decimals, so a table always reconciles to
//! the cent with the ledger it was built from. Buckets are ascending, and group tuples within a bucket are
//! ordered by type (expense before saving) and then by category name.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::errors::SummaryError;
use crate::domain::{Amounted, Bucket, Entry, EntryKind, Granularity};

/// A non-temporal field entries can be split by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Type,
    Category,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Type => f.write_str("type"),
            GroupKey::Category => f.write_str("category"),
        }
    }
}

impl FromStr for GroupKey {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "type" | "kind" => Ok(GroupKey::Type),
            "category" | "cat" => Ok(GroupKey::Category),
            other => Err(SummaryError::UnknownGroupKey(other.to_string())),
        }
    }
}

/// Non-empty set of grouping keys.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupBy(BTreeSet<GroupKey>);

impl GroupBy {
    pub fn new(keys: impl IntoIterator<Item = GroupKey>) -> Result<Self, SummaryError> {
        let keys: BTreeSet<GroupKey> = keys.into_iter().collect();
        if keys.is_empty() {
            return Err(SummaryError::EmptyGroupBy);
        }
        Ok(Self(keys))
    }

    pub fn by_type() -> Self {
        Self(BTreeSet::from([GroupKey::Type]))
    }

    pub fn by_category() -> Self {
        Self(BTreeSet::from([GroupKey::Category]))
    }

    pub fn by_type_and_category() -> Self {
        Self(BTreeSet::from([GroupKey::Type, GroupKey::Category]))
    }

    pub fn contains(&self, key: GroupKey) -> bool {
        self.0.contains(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.0.iter().copied()
    }
}

impl FromStr for GroupBy {
    type Err = SummaryError;

    /// Parses a comma separated list such as `type,category`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keys = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(GroupKey::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        GroupBy::new(keys)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.keys().map(|key| key.to_string()).collect();
        f.write_str(&labels.join(","))
    }
}

/// The grouped field values of one table row. Fields not in the `GroupBy` are `None`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupValues {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl GroupValues {
    fn for_entry(entry: &Entry, group_by: &GroupBy) -> Result<Self, SummaryError> {
        let kind = group_by.contains(GroupKey::Type).then(|| entry.kind());
        let category = if group_by.contains(GroupKey::Category) {
            let category = entry
                .category()
                .ok_or(SummaryError::MissingGroupKey(GroupKey::Category))?;
            Some(category.to_string())
        } else {
            None
        };
        Ok(Self { kind, category })
    }
}

impl fmt::Display for GroupValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.category) {
            (Some(kind), Some(category)) => write!(f, "{kind} / {category}"),
            (Some(kind), None) => write!(f, "{kind}"),
            (None, Some(category)) => f.write_str(category),
            (None, None) => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryRow {
    /// `None` in totals-only tables.
    pub bucket: Option<Bucket>,
    pub group: GroupValues,
    pub amount: Decimal,
}

/// Cumulative per-kind totals at the end of a bucket.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RunningTotal {
    pub bucket: Option<Bucket>,
    pub expense: Decimal,
    pub saving: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryTable {
    pub granularity: Option<Granularity>,
    pub group_by: GroupBy,
    rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// Sum of the cells whose group carries `kind`. Zero when the table is not grouped by type.
    pub fn total_for(&self, kind: EntryKind) -> Decimal {
        self.rows
            .iter()
            .filter(|row| row.group.kind == Some(kind))
            .map(|row| row.amount)
            .sum()
    }

    /// Distinct buckets in table order.
    pub fn buckets(&self) -> Vec<Option<Bucket>> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if seen.last() != Some(&row.bucket) {
                seen.push(row.bucket);
            }
        }
        seen
    }

    /// Distinct group tuples in table order.
    pub fn group_values(&self) -> Vec<&GroupValues> {
        let first_bucket = self.rows.first().map(|row| row.bucket);
        self.rows
            .iter()
            .take_while(|row| Some(row.bucket) == first_bucket)
            .map(|row| &row.group)
            .collect()
    }

    pub fn rows_for_bucket(&self, bucket: Option<Bucket>) -> impl Iterator<Item = &SummaryRow> {
        self.rows.iter().filter(move |row| row.bucket == bucket)
    }

    /// Cumulative expense and saving totals after each bucket.
    pub fn running_totals_by_kind(&self) -> Result<Vec<RunningTotal>, SummaryError> {
        if !self.group_by.contains(GroupKey::Type) {
            return Err(SummaryError::MissingGroupKey(GroupKey::Type));
        }
        let mut expense = Decimal::ZERO;
        let mut saving = Decimal::ZERO;
        let totals = self
            .buckets()
            .into_iter()
            .map(|bucket| {
                for row in self.rows_for_bucket(bucket) {
                    match row.group.kind {
                        Some(EntryKind::Expense) => expense += row.amount,
                        Some(EntryKind::Saving) => saving += row.amount,
                        None => {}
                    }
                }
                RunningTotal {
                    bucket,
                    expense,
                    saving,
                }
            })
            .collect();
        Ok(totals)
    }
}

/// Groups `entries` by bucket and `group_by`, summing amounts into a dense table.
///
/// With `granularity == None` all entries fall into a single implicit bucket.
/// Grouping by category fails if any entry lacks one; nothing is partially grouped.
pub fn aggregate<'a, I>(
    entries: I,
    granularity: Option<Granularity>,
    group_by: &GroupBy,
) -> Result<SummaryTable, SummaryError>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut sums: BTreeMap<(Option<Bucket>, GroupValues), Decimal> = BTreeMap::new();
    let mut buckets: BTreeSet<Option<Bucket>> = BTreeSet::new();
    let mut groups: BTreeSet<GroupValues> = BTreeSet::new();

    for entry in entries {
        let group = GroupValues::for_entry(entry, group_by)?;
        let bucket = granularity.map(|g| g.bucket(entry.date()));
        buckets.insert(bucket);
        groups.insert(group.clone());
        *sums.entry((bucket, group)).or_insert(Decimal::ZERO) += entry.amount();
    }

    let mut rows = Vec::with_capacity(buckets.len() * groups.len());
    for bucket in &buckets {
        for group in &groups {
            let amount = sums.remove(&(*bucket, group.clone())).unwrap_or(Decimal::ZERO);
            rows.push(SummaryRow {
                bucket: *bucket,
                group: group.clone(),
                amount,
            });
        }
    }

    Ok(SummaryTable {
        granularity,
        group_by: group_by.clone(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryDraft;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(date: NaiveDate, kind: EntryKind, category: &str, amount: Decimal) -> Entry {
        EntryDraft::new(date, kind, amount)
            .with_category(category)
            .validate()
            .unwrap()
    }

    #[test]
    fn group_by_rejects_empty_and_unknown_keys() {
        assert_eq!(GroupBy::new([]).unwrap_err(), SummaryError::EmptyGroupBy);
        assert_eq!("".parse::<GroupBy>().unwrap_err(), SummaryError::EmptyGroupBy);
        assert!(matches!(
            "type,colour".parse::<GroupBy>(),
            Err(SummaryError::UnknownGroupKey(_))
        ));
        let parsed: GroupBy = "category, type".parse().unwrap();
        assert_eq!(parsed, GroupBy::by_type_and_category());
        assert_eq!(parsed.to_string(), "type,category");
    }

    #[test]
    fn missing_combinations_are_zero_filled() {
        let entries = vec![
            entry(day(2024, 1, 1), EntryKind::Expense, "Food", dec!(10)),
            entry(day(2024, 1, 2), EntryKind::Expense, "Rent", dec!(500)),
        ];
        let table = aggregate(&entries, Some(Granularity::Daily), &GroupBy::by_category()).unwrap();
        let cells: Vec<(String, String, Decimal)> = table
            .rows()
            .iter()
            .map(|row| {
                (
                    row.bucket.unwrap().label(),
                    row.group.to_string(),
                    row.amount,
                )
            })
            .collect();
        assert_eq!(
            cells,
            vec![
                ("2024-01-01".to_string(), "Food".to_string(), dec!(10)),
                ("2024-01-01".to_string(), "Rent".to_string(), dec!(0)),
                ("2024-01-02".to_string(), "Food".to_string(), dec!(0)),
                ("2024-01-02".to_string(), "Rent".to_string(), dec!(500)),
            ]
        );
        let groups: Vec<String> = table.group_values().iter().map(|g| g.to_string()).collect();
        assert_eq!(groups, vec!["Food", "Rent"]);
        assert_eq!(table.buckets().len(), 2);
    }

    #[test]
    fn totals_only_collapses_into_single_bucket() {
        let entries = vec![
            entry(day(2023, 5, 1), EntryKind::Expense, "Food", dec!(1.5)),
            entry(day(2024, 6, 1), EntryKind::Saving, "Salary", dec!(8)),
            entry(day(2024, 7, 1), EntryKind::Expense, "Food", dec!(2.5)),
        ];
        let table = aggregate(&entries, None, &GroupBy::by_type()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|row| row.bucket.is_none()));
        assert_eq!(table.total_for(EntryKind::Expense), dec!(4));
        assert_eq!(table.total_for(EntryKind::Saving), dec!(8));
        assert_eq!(table.buckets(), vec![None]);
    }

    #[test]
    fn category_grouping_on_type_only_entries_is_rejected() {
        let entries = vec![
            entry(day(2024, 1, 1), EntryKind::Expense, "Food", dec!(10)),
            EntryDraft::new(day(2024, 1, 2), EntryKind::Saving, dec!(3))
                .validate()
                .unwrap(),
        ];
        let err = aggregate(&entries, None, &GroupBy::by_type_and_category()).unwrap_err();
        assert_eq!(err, SummaryError::MissingGroupKey(GroupKey::Category));

        let by_type = aggregate(&entries, None, &GroupBy::by_type()).unwrap();
        assert_eq!(by_type.total(), dec!(13));
    }

    #[test]
    fn categories_are_case_sensitive_and_sorted() {
        let entries = vec![
            entry(day(2024, 1, 1), EntryKind::Expense, "food", dec!(1)),
            entry(day(2024, 1, 1), EntryKind::Expense, "Food", dec!(2)),
            entry(day(2024, 1, 1), EntryKind::Saving, "Bonus", dec!(4)),
        ];
        let table = aggregate(&entries, None, &GroupBy::by_type_and_category()).unwrap();
        let labels: Vec<String> = table.rows().iter().map(|row| row.group.to_string()).collect();
        assert_eq!(
            labels,
            vec!["Expense / Food", "Expense / food", "Saving / Bonus"]
        );
        assert_eq!(table.total(), dec!(7));
    }

    #[test]
    fn running_totals_accumulate_per_bucket() {
        let entries = vec![
            entry(day(2024, 1, 3), EntryKind::Expense, "Food", dec!(10)),
            entry(day(2024, 2, 3), EntryKind::Saving, "Salary", dec!(100)),
            entry(day(2024, 3, 3), EntryKind::Expense, "Food", dec!(5)),
        ];
        let table = aggregate(&entries, Some(Granularity::Monthly), &GroupBy::by_type()).unwrap();
        let running = table.running_totals_by_kind().unwrap();
        let pairs: Vec<(Decimal, Decimal)> = running.iter().map(|t| (t.expense, t.saving)).collect();
        assert_eq!(pairs, vec![
                (dec!(10), dec!(0)),
                (dec!(10), dec!(100)),
                (dec!(15), dec!(100))
            ]);

        let by_category =
            aggregate(&entries, Some(Granularity::Monthly), &GroupBy::by_category()).unwrap();
        assert_eq!(
            by_category.running_totals_by_kind().unwrap_err(),
            SummaryError::MissingGroupKey(GroupKey::Type)
        );
    }

    #[test]
    fn entries_at_the_calendar_edges_are_bucketed() {
        let entries = vec![
            entry(NaiveDate::MIN, EntryKind::Saving, "Vault", dec!(1)),
            entry(NaiveDate::MAX, EntryKind::Expense, "Food", dec!(12.5)),
        ];
        for granularity in Granularity::ALL {
            let table = aggregate(&entries, Some(granularity), &GroupBy::by_type()).unwrap();
            assert_eq!(table.buckets().len(), 2, "{granularity}");
            assert_eq!(table.total(), dec!(13.5));
            let last = table.buckets().last().copied().flatten().unwrap();
            assert!(last.contains(NaiveDate::MAX));
        }
    }

    #[test]
    fn cents_sum_without_drift() {
        let entries: Vec<Entry> = [dec!(0.1), dec!(0.2), dec!(19.99), dec!(8.51)]
            .into_iter()
            .map(|amount| entry(day(2024, 1, 1), EntryKind::Expense, "Food", amount))
            .collect();
        let table = aggregate(&entries, Some(Granularity::Daily), &GroupBy::by_type()).unwrap();
        assert_eq!(table.total(), dec!(28.8));
        assert_eq!(table.total_for(EntryKind::Expense), dec!(28.8));
    }

    #[test]
    fn empty_input_produces_empty_table() {
        let entries: Vec<Entry> = Vec::new();
        let table = aggregate(&entries, Some(Granularity::Weekly), &GroupBy::by_type()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.total(), Decimal::ZERO);
        assert!(table.running_totals_by_kind().unwrap().is_empty());
    }
}
