//! Assembles the data the dashboard displays.
//!
//! Combines the monthly rollup for the current year with the 30-day change
//! statistics into a single [DashboardView].

use std::ops::RangeInclusive;

use serde::Serialize;
use time::{Date, Duration, Month};

use crate::{
    Error,
    dashboard::{
        aggregation::{MonthlyRollup, aggregate_by_month},
        change::{PeriodStat, compare_windows},
    },
    stores::{TransactionQuery, TransactionStore},
    transaction::Transaction,
    user::UserId,
};

/// The length of each comparison window.
pub const COMPARISON_WINDOW_DAYS: i64 = 30;

/// Everything the presentation layer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    /// Expenses, income and result, in that order.
    pub stats: [PeriodStat; 3],
    /// The current year's transactions by month, in calendar order.
    pub monthly_buckets: MonthlyRollup,
}

/// The two adjacent 30-day windows compared on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonWindows {
    /// The 30 days up to and including today.
    pub current: RangeInclusive<Date>,
    /// The 30 days before the current window.
    pub previous: RangeInclusive<Date>,
}

/// Get the comparison windows ending on `today`.
///
/// Both ranges are inclusive and do not overlap: the current window starts
/// 30 days before today and the previous window ends the day before that.
pub fn comparison_windows(today: Date) -> ComparisonWindows {
    let window = Duration::days(COMPARISON_WINDOW_DAYS);
    let current_start = today.saturating_sub(window);
    let previous_end = current_start.saturating_sub(Duration::days(1));
    let previous_start = today.saturating_sub(window * 2);

    ComparisonWindows {
        current: current_start..=today,
        previous: previous_start..=previous_end,
    }
}

/// Get the inclusive date range for the calendar year containing `today`.
///
/// # Errors
/// Returns [Error::InvalidDate] if the year is outside the supported range.
pub fn year_range(today: Date) -> Result<RangeInclusive<Date>, Error> {
    let year = today.year();
    let start = Date::from_calendar_date(year, Month::January, 1)?;
    let end = Date::from_calendar_date(year, Month::December, 31)?;

    Ok(start..=end)
}

/// Merge the monthly rollup and window comparison into a [DashboardView].
///
/// `year_transactions` are bucketed by month for the year of `today`.
pub fn assemble_dashboard(
    year_transactions: &[Transaction],
    current_window: &[Transaction],
    previous_window: &[Transaction],
    today: Date,
) -> DashboardView {
    DashboardView {
        stats: compare_windows(current_window, previous_window).into_stats(),
        monthly_buckets: aggregate_by_month(year_transactions, today),
    }
}

/// Fetch a user's transactions and build their dashboard as of `today`.
///
/// # Errors
/// Returns an error if the store fails or `today` is at the edge of the
/// supported date range.
pub fn build_dashboard(
    store: &impl TransactionStore,
    user_id: UserId,
    today: Date,
) -> Result<DashboardView, Error> {
    let windows = comparison_windows(today);

    let year_transactions =
        store.fetch_transactions(user_id, TransactionQuery::within(year_range(today)?))?;
    let current_window =
        store.fetch_transactions(user_id, TransactionQuery::within(windows.current))?;
    let previous_window =
        store.fetch_transactions(user_id, TransactionQuery::within(windows.previous))?;

    Ok(assemble_dashboard(
        &year_transactions,
        &current_window,
        &previous_window,
        today,
    ))
}
