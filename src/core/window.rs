//! Resolves view requests into the entries and bucketing the aggregator needs.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::aggregate::{aggregate, GroupBy, SummaryTable};
use crate::core::clock::Clock;
use crate::core::errors::SummaryError;
use crate::domain::{DateRange, Entry, Granularity, RangeError};

/// What the caller wants to look at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ViewRequest {
    /// Whole history bucketed at a fixed granularity.
    Granular { granularity: Granularity },
    /// Entries dated within an inclusive range.
    Range {
        range: DateRange,
        granularity: Option<Granularity>,
    },
    /// Monday..Sunday of the clock's current week, resolved on every request.
    CurrentWeek { granularity: Option<Granularity> },
}

impl ViewRequest {
    pub fn granular(granularity: Granularity) -> Self {
        ViewRequest::Granular { granularity }
    }

    /// Builds a range view, rejecting `start > end`.
    pub fn range(
        start: NaiveDate,
        end: NaiveDate,
        granularity: Option<Granularity>,
    ) -> Result<Self, RangeError> {
        Ok(ViewRequest::Range {
            range: DateRange::new(start, end)?,
            granularity,
        })
    }

    pub fn current_week() -> Self {
        ViewRequest::CurrentWeek { granularity: None }
    }

    pub fn granularity(&self) -> Option<Granularity> {
        match self {
            ViewRequest::Granular { granularity } => Some(*granularity),
            ViewRequest::Range { granularity, .. } | ViewRequest::CurrentWeek { granularity } => {
                *granularity
            }
        }
    }
}

impl fmt::Display for ViewRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewRequest::Granular { granularity } => write!(f, "{granularity} (all history)"),
            ViewRequest::Range { range, .. } => write!(f, "Range {range}"),
            ViewRequest::CurrentWeek { .. } => f.write_str("Current week"),
        }
    }
}

/// Entries that passed the view's date predicate, plus how to bucket them.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub entries: Vec<&'a Entry>,
    pub range: Option<DateRange>,
    pub granularity: Option<Granularity>,
}

impl Selection<'_> {
    pub fn aggregate(&self, group_by: &GroupBy) -> Result<SummaryTable, SummaryError> {
        aggregate(self.entries.iter().copied(), self.granularity, group_by)
    }
}

/// Applies `view` to `entries`, preserving their order.
pub fn select<'a>(
    entries: &'a [Entry],
    view: &ViewRequest,
    clock: &dyn Clock,
) -> Result<Selection<'a>, SummaryError> {
    let range = match view {
        ViewRequest::Granular { .. } => None,
        ViewRequest::Range { range, .. } => {
            // Ranges can arrive deserialized, bypassing `DateRange::new`.
            Some(DateRange::new(range.start, range.end)?)
        }
        ViewRequest::CurrentWeek { .. } => Some(DateRange::week_of(clock.today())),
    };

    let entries = entries
        .iter()
        .filter(|entry| range.map_or(true, |r| r.contains(entry.date())))
        .collect();

    Ok(Selection {
        entries,
        range,
        granularity: view.granularity(),
    })
}
