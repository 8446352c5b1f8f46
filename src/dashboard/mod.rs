//! Dashboard module
//!
//! Summarises a user's transactions for the dashboard: sums by calendar month
//! for the current year, and how the last 30 days compare with the 30 days
//! before.

pub mod aggregation;
pub mod change;
mod handlers;
mod totals;
pub mod view;

pub use aggregation::{MonthlyBucket, MonthlyRollup, aggregate_by_month};
pub use change::{ChangeType, MetricKind, PeriodStat, WindowComparison, compare_windows};
pub use handlers::{DashboardState, get_dashboard};
pub use totals::TypeTotals;
pub use view::{DashboardView, assemble_dashboard, build_dashboard, comparison_windows};
