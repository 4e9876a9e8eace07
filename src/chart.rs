use chrono::Month;
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::MonthlyAggregate;

pub const CHART_TITLE: &str = "Monthly Expense Overview";

/// One bar of the monthly chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBar {
    pub month: u32,
    pub label: &'static str,
    pub total: Decimal,
}

/// English month name for 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    let month = u8::try_from(month).ok()?;
    Month::try_from(month).ok().map(|m| m.name())
}

/// Pair each aggregate's month name with its server-computed total, in the
/// order the server returned them. Month numbers outside 1..=12 are skipped.
pub fn monthly_bars(aggregates: &[MonthlyAggregate]) -> Vec<MonthBar> {
    aggregates
        .iter()
        .filter_map(|agg| match month_name(agg.month) {
            Some(label) => Some(MonthBar {
                month: agg.month,
                label,
                total: agg.total_expenses,
            }),
            None => {
                warn!("Skipping aggregate with invalid month {}", agg.month);
                None
            }
        })
        .collect()
}
