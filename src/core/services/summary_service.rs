use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::core::aggregate::{aggregate, GroupBy, RunningTotal, SummaryTable};
use crate::core::clock::Clock;
use crate::core::window::{select, ViewRequest};
use crate::domain::{DateRange, EntryKind, Granularity, Ledger};

use super::ServiceResult;

/// Always-on headline numbers, independent of the interactive view.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct FixedMetrics {
    pub lifetime_expense: Decimal,
    pub lifetime_saving: Decimal,
    pub current_week_expense: Decimal,
    pub current_week: DateRange,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryReport {
    pub view: ViewRequest,
    /// Concrete date range the view resolved to, if it filtered by date.
    pub range: Option<DateRange>,
    pub table: SummaryTable,
    pub metrics: FixedMetrics,
}

pub struct SummaryService;

impl SummaryService {
    /// Runs filter → bucket → aggregate for `view` and attaches the fixed metrics.
    pub fn summarize(
        ledger: &Ledger,
        view: ViewRequest,
        group_by: &GroupBy,
        clock: &dyn Clock,
    ) -> ServiceResult<SummaryReport> {
        let selection = select(ledger.entries(), &view, clock)?;
        debug!(
            "view {} selected {} of {} entries",
            view,
            selection.entries.len(),
            ledger.len()
        );
        let table = selection.aggregate(group_by)?;
        let metrics = Self::fixed_metrics(ledger, clock)?;
        Ok(SummaryReport {
            view,
            range: selection.range,
            table,
            metrics,
        })
    }

    /// Lifetime totals per type and this week's expenses, via the same
    /// aggregation path as the detailed tables.
    pub fn fixed_metrics(ledger: &Ledger, clock: &dyn Clock) -> ServiceResult<FixedMetrics> {
        let lifetime = aggregate(ledger.entries(), None, &GroupBy::by_type())?;
        let week_view = ViewRequest::current_week();
        let week = select(ledger.entries(), &week_view, clock)?;
        let week_table = week.aggregate(&GroupBy::by_type())?;
        let current_week = week
            .range
            .unwrap_or_else(|| DateRange::week_of(clock.today()));
        Ok(FixedMetrics {
            lifetime_expense: lifetime.total_for(EntryKind::Expense),
            lifetime_saving: lifetime.total_for(EntryKind::Saving),
            current_week_expense: week_table.total_for(EntryKind::Expense),
            current_week,
        })
    }

    /// Cumulative expense/saving totals per bucket across the whole history.
    pub fn running_totals(
        ledger: &Ledger,
        granularity: Granularity,
    ) -> ServiceResult<Vec<RunningTotal>> {
        let table = aggregate(ledger.entries(), Some(granularity), &GroupBy::by_type())?;
        Ok(table.running_totals_by_kind()?)
    }
}

/// Holds the last successfully produced report so a rejected request does not
/// blank out what the user was looking at.
#[derive(Debug, Default)]
pub struct SummaryView {
    last: Option<SummaryReport>,
}

impl SummaryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the report. On error the previous report stays available via [`Self::last`].
    pub fn refresh(
        &mut self,
        ledger: &Ledger,
        view: ViewRequest,
        group_by: &GroupBy,
        clock: &dyn Clock,
    ) -> ServiceResult<&SummaryReport> {
        let report = SummaryService::summarize(ledger, view, group_by, clock)?;
        Ok(self.last.insert(report))
    }

    pub fn last(&self) -> Option<&SummaryReport> {
        self.last.as_ref()
    }
}
