//! Text rendering of reports for the terminal.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::core::services::{FixedMetrics, SummaryReport};
use crate::core::{GroupKey, RunningTotal, SummaryTable};

use super::output::{styled, MessageKind};
use super::table::{Table, TableColumn};

/// Two decimal places, half-cents rounded away from zero.
pub fn money(symbol: &str, amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{symbol}{cents:.2}")
}

/// Renders the grouped table. Only the columns the table is grouped on appear.
pub fn render_table(table: &SummaryTable, symbol: &str) -> String {
    let bucketed = table.granularity.is_some();
    let by_type = table.group_by.contains(GroupKey::Type);
    let by_category = table.group_by.contains(GroupKey::Category);

    let mut columns = Vec::new();
    if bucketed {
        columns.push(TableColumn::left("Bucket"));
    }
    if by_type {
        columns.push(TableColumn::left("Type"));
    }
    if by_category {
        columns.push(TableColumn::left("Category"));
    }
    columns.push(TableColumn::right("Amount"));

    let mut out = Table::new(columns);
    for row in table.rows() {
        let mut cells = Vec::new();
        if bucketed {
            cells.push(row.bucket.map(|b| b.label()).unwrap_or_default());
        }
        if by_type {
            cells.push(row.group.kind.map(|k| k.to_string()).unwrap_or_default());
        }
        if by_category {
            cells.push(row.group.category.clone().unwrap_or_default());
        }
        cells.push(money(symbol, row.amount));
        out.push(cells);
    }
    out.render()
}

pub fn render_metrics(metrics: &FixedMetrics, symbol: &str) -> String {
    [
        styled(MessageKind::Section, "Metrics"),
        format!(
            "Lifetime expenses:  {}",
            money(symbol, metrics.lifetime_expense)
        ),
        format!(
            "Lifetime savings:   {}",
            money(symbol, metrics.lifetime_saving)
        ),
        format!(
            "This week ({}): {}",
            metrics.current_week,
            money(symbol, metrics.current_week_expense)
        ),
    ]
    .join("\n")
}

pub fn render_report(report: &SummaryReport, symbol: &str) -> String {
    let mut lines = vec![styled(MessageKind::Section, &report.view)];
    if let Some(range) = report.range {
        lines.push(format!("Dates: {range}"));
    }
    if report.table.is_empty() {
        lines.push("No entries in this view.".to_string());
    } else {
        lines.push(render_table(&report.table, symbol));
        lines.push(format!("Total: {}", money(symbol, report.table.total())));
    }
    lines.push(String::new());
    lines.push(render_metrics(&report.metrics, symbol));
    lines.join("\n")
}

pub fn render_running(totals: &[RunningTotal], symbol: &str) -> String {
    let mut table = Table::new(vec![
        TableColumn::left("Bucket"),
        TableColumn::right("Expenses"),
        TableColumn::right("Savings"),
    ]);
    for total in totals {
        table.push(vec![
            total.bucket.map(|b| b.label()).unwrap_or_default(),
            money(symbol, total.expense),
            money(symbol, total.saving),
        ]);
    }
    table.render()
}
