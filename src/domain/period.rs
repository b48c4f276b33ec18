//! Calendar bucketing primitives: granularities, buckets, and inclusive date ranges.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bucket size used when grouping entries chronologically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 4] = [
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
        Granularity::Yearly,
    ];

    /// Returns the first day of the bucket containing `date`.
    ///
    /// Weeks always start on Monday.
    pub fn bucket_start(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => date,
            Granularity::Weekly => {
                let delta = date.weekday().num_days_from_monday() as i64;
                date.checked_sub_signed(Duration::days(delta))
                    .unwrap_or(NaiveDate::MIN)
            }
            Granularity::Monthly => first_of_month(date.year(), date.month()).unwrap_or(date),
            Granularity::Yearly => first_of_month(date.year(), 1).unwrap_or(date),
        }
    }

    /// Returns the inclusive last day of the bucket that begins at `start`.
    ///
    /// Buckets at the edges of the supported calendar are clamped to
    /// `NaiveDate::MIN`/`NaiveDate::MAX`.
    pub fn bucket_end(self, start: NaiveDate) -> NaiveDate {
        let start = self.bucket_start(start);
        match self {
            Granularity::Daily => start,
            Granularity::Weekly => {
                let to_sunday = 6 - start.weekday().num_days_from_monday() as i64;
                start
                    .checked_add_signed(Duration::days(to_sunday))
                    .unwrap_or(NaiveDate::MAX)
            }
            Granularity::Monthly => last_of_month(start.year(), start.month()).unwrap_or(start),
            Granularity::Yearly => NaiveDate::from_ymd_opt(start.year(), 12, 31).unwrap_or(start),
        }
    }

    pub fn bucket(self, date: NaiveDate) -> Bucket {
        let start = self.bucket_start(date);
        Bucket {
            granularity: self,
            start,
            end: self.bucket_end(start),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
            Granularity::Yearly => "Yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown granularity `{0}` (expected daily, weekly, monthly or yearly)")]
pub struct ParseGranularityError(pub String);

impl FromStr for Granularity {
    type Err = ParseGranularityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Granularity::Daily),
            "w" | "week" | "weekly" => Ok(Granularity::Weekly),
            "m" | "month" | "monthly" => Ok(Granularity::Monthly),
            "y" | "year" | "yearly" => Ok(Granularity::Yearly),
            _ => Err(ParseGranularityError(s.to_string())),
        }
    }
}

/// A calendar interval produced by a [`Granularity`]; both bounds inclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl Bucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn label(&self) -> String {
        match self.granularity {
            Granularity::Daily => self.start.format("%Y-%m-%d").to_string(),
            Granularity::Weekly => format!(
                "{}..{}",
                self.start.format("%Y-%m-%d"),
                self.end.format("%Y-%m-%d")
            ),
            Granularity::Monthly => self.start.format("%Y-%m").to_string(),
            Granularity::Yearly => self.start.format("%Y").to_string(),
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Raised when a range is requested with its start after its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid date range: start {start} is after end {end}")]
pub struct RangeError {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Inclusive calendar range `start..=end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError { start, end });
        }
        Ok(Self { start, end })
    }

    /// Monday through Sunday of the week containing `date`.
    pub fn week_of(date: NaiveDate) -> Self {
        let bucket = Granularity::Weekly.bucket(date);
        Self {
            start: bucket.start,
            end: bucket.end,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}..{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if month == 12 {
        return NaiveDate::from_ymd_opt(year, 12, 31);
    }
    first_of_month(year, month + 1)?.pred_opt()
}
