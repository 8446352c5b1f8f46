//! Period-over-period change statistics.
//!
//! Compares the sums of two 30-day windows and classifies each change by both
//! its direction and whether that direction is good for the user's finances.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{currency::CurrencyValue, dashboard::totals::TypeTotals, transaction::Transaction};

pub(crate) const EXPENSES_STAT_NAME: &str = "Total Expenses";
pub(crate) const INCOME_STAT_NAME: &str = "Total Income";
pub(crate) const RESULT_STAT_NAME: &str = "Total Result";

/// The kind of metric a change is measured on, which decides whether growth
/// is good or bad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Spending. Growth is bad.
    Expense,
    /// Earnings. Growth is good.
    Income,
    /// A net figure with no type of its own. Growth is good.
    Total,
}

/// The direction of a change combined with whether it is desirable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    /// The value went up, which is good.
    PositiveIncrease,
    /// The value went up, which is bad.
    NegativeIncrease,
    /// The value went down, which is good.
    PositiveDecrease,
    /// The value went down, which is bad.
    NegativeDecrease,
}

impl ChangeType {
    /// Classify a percentage change for `metric`.
    ///
    /// A change of exactly zero counts as an increase.
    pub fn classify(percentage: Decimal, metric: MetricKind) -> Self {
        let increased = percentage >= Decimal::ZERO;

        match (metric, increased) {
            (MetricKind::Expense, true) => ChangeType::NegativeIncrease,
            (MetricKind::Expense, false) => ChangeType::PositiveDecrease,
            (MetricKind::Income | MetricKind::Total, true) => ChangeType::PositiveIncrease,
            (MetricKind::Income | MetricKind::Total, false) => ChangeType::NegativeDecrease,
        }
    }
}

/// The percentage change from `previous` to `current`,
/// `(current - previous) / previous * 100`.
///
/// Returns `None` when `previous` is zero and the change is not finite.
pub fn percentage_change(previous: CurrencyValue, current: CurrencyValue) -> Option<Decimal> {
    current
        .subtract(previous)
        .divide(previous)
        .finite()
        .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
}

/// Formats a percentage with at most two fractional digits, e.g. "12.5%".
///
/// A non-finite change is shown as "0%".
pub fn format_percentage(percentage: Option<Decimal>) -> String {
    let Some(percentage) = percentage else {
        return "0%".to_owned();
    };

    let rounded = percentage
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    if rounded.is_zero() {
        "0%".to_owned()
    } else {
        format!("{rounded}%")
    }
}

/// A metric's value over the current and previous windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStat {
    /// The label shown to the user, e.g. "Total Expenses".
    pub name: String,
    /// The metric over the most recent window.
    pub stat: CurrencyValue,
    /// The metric over the window before that.
    pub previous_stat: CurrencyValue,
    /// The percentage change, e.g. "12.5%".
    pub change: String,
    pub change_type: ChangeType,
}

impl PeriodStat {
    /// Compute the change from `previous` to `current` for a metric.
    pub fn new(
        name: &str,
        metric: MetricKind,
        previous: CurrencyValue,
        current: CurrencyValue,
    ) -> Self {
        let percentage = percentage_change(previous, current);

        Self {
            name: name.to_owned(),
            stat: current,
            previous_stat: previous,
            change: format_percentage(percentage),
            change_type: ChangeType::classify(percentage.unwrap_or_default(), metric),
        }
    }
}

/// The statistics for the three dashboard metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowComparison {
    pub expenses: PeriodStat,
    pub income: PeriodStat,
    pub result: PeriodStat,
}

impl WindowComparison {
    /// The stats in display order: expenses, income, result.
    pub fn into_stats(self) -> [PeriodStat; 3] {
        [self.expenses, self.income, self.result]
    }
}

/// Compare the sums of two windows of transactions.
///
/// Expenses are compared with their economic (negative) sign. An empty window
/// sums to zero, so a change from an empty previous window is reported as
/// "0%".
pub fn compare_windows(
    current_window: &[Transaction],
    previous_window: &[Transaction],
) -> WindowComparison {
    let current = TypeTotals::from_transactions(current_window);
    let previous = TypeTotals::from_transactions(previous_window);

    tracing::debug!(
        "comparing window of {} transactions against previous window of {}",
        current_window.len(),
        previous_window.len()
    );

    WindowComparison {
        expenses: PeriodStat::new(
            EXPENSES_STAT_NAME,
            MetricKind::Expense,
            previous.expense_sum(),
            current.expense_sum(),
        ),
        income: PeriodStat::new(
            INCOME_STAT_NAME,
            MetricKind::Income,
            previous.income_sum(),
            current.income_sum(),
        ),
        result: PeriodStat::new(
            RESULT_STAT_NAME,
            MetricKind::Total,
            previous.total(),
            current.total(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        currency::CurrencyValue,
        transaction::{Transaction, TransactionFrequency, TransactionType},
        user::UserId,
    };

    use super::{
        ChangeType, MetricKind, PeriodStat, compare_windows, format_percentage, percentage_change,
    };

    fn money(text: &str) -> CurrencyValue {
        text.parse().unwrap()
    }

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn transaction(amount: &str, transaction_type: TransactionType) -> Transaction {
        Transaction {
            id: 0,
            title: "Test".to_owned(),
            amount: amount.parse().unwrap(),
            transaction_type,
            frequency: TransactionFrequency::Variable,
            date: date!(2024 - 06 - 01),
            user_id: UserId::new(1),
        }
    }

    #[test]
    fn classification_table() {
        let up = decimal("12.5");
        let down = decimal("-12.5");

        assert_eq!(ChangeType::classify(up, MetricKind::Expense), ChangeType::NegativeIncrease);
        assert_eq!(ChangeType::classify(down, MetricKind::Expense), ChangeType::PositiveDecrease);
        assert_eq!(ChangeType::classify(up, MetricKind::Income), ChangeType::PositiveIncrease);
        assert_eq!(ChangeType::classify(down, MetricKind::Income), ChangeType::NegativeDecrease);
        assert_eq!(ChangeType::classify(up, MetricKind::Total), ChangeType::PositiveIncrease);
        assert_eq!(ChangeType::classify(down, MetricKind::Total), ChangeType::NegativeDecrease);
    }

    #[test]
    fn zero_change_counts_as_increase() {
        assert_eq!(
            ChangeType::classify(Decimal::ZERO, MetricKind::Expense),
            ChangeType::NegativeIncrease
        );
        assert_eq!(
            ChangeType::classify(Decimal::ZERO, MetricKind::Total),
            ChangeType::PositiveIncrease
        );
    }

    #[test]
    fn change_type_serializes_as_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ChangeType::NegativeIncrease).unwrap(),
            "\"negative-increase\""
        );
        assert_eq!(
            serde_json::to_string(&ChangeType::PositiveDecrease).unwrap(),
            "\"positive-decrease\""
        );
    }

    #[test]
    fn percentage_change_of_positive_values() {
        assert_eq!(
            percentage_change(money("80"), money("90")),
            Some(decimal("12.5"))
        );
        assert_eq!(
            percentage_change(money("200"), money("100")),
            Some(decimal("-50"))
        );
    }

    #[test]
    fn percentage_change_from_zero_is_non_finite() {
        assert_eq!(percentage_change(CurrencyValue::ZERO, money("200")), None);
        assert_eq!(percentage_change(CurrencyValue::ZERO, CurrencyValue::ZERO), None);
    }

    #[test]
    fn formats_percentages() {
        assert_eq!(format_percentage(Some(decimal("12.5"))), "12.5%");
        assert_eq!(format_percentage(Some(decimal("50.000"))), "50%");
        assert_eq!(format_percentage(Some(decimal("-33.3333"))), "-33.33%");
        assert_eq!(format_percentage(Some(decimal("0.004"))), "0%");
        assert_eq!(format_percentage(Some(decimal("-0.001"))), "0%");
        assert_eq!(format_percentage(None), "0%");
    }

    #[test]
    fn expense_growth_is_negative_increase() {
        let stat = PeriodStat::new(
            "Total Expenses",
            MetricKind::Expense,
            money("-100"),
            money("-150"),
        );

        assert_eq!(stat.change, "50%");
        assert_eq!(stat.change_type, ChangeType::NegativeIncrease);
    }

    #[test]
    fn expense_shrink_is_positive_decrease() {
        let stat = PeriodStat::new(
            "Total Expenses",
            MetricKind::Expense,
            money("-100"),
            money("-50"),
        );

        assert_eq!(stat.change, "-50%");
        assert_eq!(stat.change_type, ChangeType::PositiveDecrease);
    }

    #[test]
    fn compare_windows_polarity_from_transactions() {
        let previous = [transaction("100", TransactionType::Expense)];
        let grew = [
            transaction("100", TransactionType::Expense),
            transaction("50", TransactionType::Expense),
        ];
        let shrank = [transaction("50", TransactionType::Expense)];

        let comparison = compare_windows(&grew, &previous);
        assert_eq!(comparison.expenses.previous_stat, money("-100"));
        assert_eq!(comparison.expenses.stat, money("-150"));
        assert_eq!(comparison.expenses.change_type, ChangeType::NegativeIncrease);

        let comparison = compare_windows(&shrank, &previous);
        assert_eq!(comparison.expenses.stat, money("-50"));
        assert_eq!(comparison.expenses.change_type, ChangeType::PositiveDecrease);
    }

    #[test]
    fn zero_previous_window_clamps_every_change() {
        let current = [
            transaction("200", TransactionType::Income),
            transaction("80", TransactionType::Expense),
        ];

        let comparison = compare_windows(&current, &[]);

        for stat in comparison.into_stats() {
            assert_eq!(stat.change, "0%", "unexpected change for {}", stat.name);
            assert_eq!(stat.previous_stat, CurrencyValue::ZERO);
        }
    }

    #[test]
    fn empty_previous_window_result_stat() {
        let current = [transaction("200", TransactionType::Income)];

        let result = compare_windows(&current, &[]).result;

        assert_eq!(
            result,
            PeriodStat {
                name: "Total Result".to_owned(),
                stat: money("200"),
                previous_stat: CurrencyValue::ZERO,
                change: "0%".to_owned(),
                change_type: ChangeType::PositiveIncrease,
            }
        );
    }

    #[test]
    fn both_windows_empty() {
        let comparison = compare_windows(&[], &[]);

        for stat in comparison.into_stats() {
            assert_eq!(stat.stat, CurrencyValue::ZERO);
            assert_eq!(stat.change, "0%");
        }
    }

    #[test]
    fn result_is_income_plus_signed_expenses() {
        let previous = [
            transaction("1000", TransactionType::Income),
            transaction("600", TransactionType::Expense),
        ];
        let current = [
            transaction("1000", TransactionType::Income),
            transaction("500", TransactionType::Expense),
        ];

        let comparison = compare_windows(&current, &previous);

        assert_eq!(comparison.result.previous_stat, money("400"));
        assert_eq!(comparison.result.stat, money("500"));
        assert_eq!(comparison.result.change, "25%");
        assert_eq!(comparison.result.change_type, ChangeType::PositiveIncrease);
        assert_eq!(comparison.income.change, "0%");
        assert_eq!(comparison.income.change_type, ChangeType::PositiveIncrease);
    }

    #[test]
    fn negative_base_flips_result_direction() {
        let previous = [transaction("100", TransactionType::Expense)];
        let current = [transaction("300", TransactionType::Expense)];

        let result = compare_windows(&current, &previous).result;

        // (-300 + 100) / -100, a negative base flips the sign.
        assert_eq!(result.change, "200%");
        assert_eq!(result.change_type, ChangeType::PositiveIncrease);
    }

    #[test]
    fn unrecognized_types_do_not_affect_stats() {
        let previous = [transaction("100", TransactionType::Income)];
        let current = [
            transaction("100", TransactionType::Income),
            transaction("900", TransactionType::Unrecognized("TRANSFER".to_owned())),
        ];

        let comparison = compare_windows(&current, &previous);

        assert_eq!(comparison.income.stat, money("100"));
        assert_eq!(comparison.expenses.stat, CurrencyValue::ZERO);
        assert_eq!(comparison.result.change, "0%");
    }

    #[test]
    fn stats_are_in_display_order() {
        let names: Vec<String> = compare_windows(&[], &[])
            .into_stats()
            .into_iter()
            .map(|stat| stat.name)
            .collect();

        assert_eq!(names, vec!["Total Expenses", "Total Income", "Total Result"]);
    }
}
