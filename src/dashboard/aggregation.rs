//! Transaction data aggregation by calendar month.
//!
//! Folds a year's transactions into one bucket per month, keyed by the month
//! of each transaction's own date.

use serde::{Serialize, Serializer, ser::SerializeMap};
use time::{Date, Month};

use crate::{dashboard::totals::TypeTotals, transaction::Transaction};

/// The income, expense and net sums for a single calendar month.
pub type MonthlyBucket = TypeTotals;

/// One [MonthlyBucket] per month that had at least one transaction, for a
/// single calendar year.
///
/// Buckets are always iterated and serialized in calendar order, regardless of
/// the order of the input transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRollup {
    year: i32,
    buckets: [Option<MonthlyBucket>; 12],
}

impl MonthlyRollup {
    /// A rollup for `year` with no buckets.
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            buckets: [None; 12],
        }
    }

    /// The calendar year the rollup covers.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The bucket for `month`, if any transaction fell in that month.
    pub fn get(&self, month: Month) -> Option<&MonthlyBucket> {
        self.buckets[month_index(month)].as_ref()
    }

    /// The non-empty buckets in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (Month, &MonthlyBucket)> {
        self.buckets
            .iter()
            .enumerate()
            .filter_map(|(index, bucket)| {
                bucket
                    .as_ref()
                    .map(|bucket| (Month::January.nth_next(index as u8), bucket))
            })
    }

    /// The number of months with a bucket.
    pub fn len(&self) -> usize {
        self.buckets.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Assign `transaction` to the bucket for its month, creating the bucket
    /// the first time the month is seen.
    fn record(mut self, transaction: &Transaction) -> Self {
        let slot = &mut self.buckets[month_index(transaction.date.month())];
        *slot = Some(slot.unwrap_or_default().record(transaction));
        self
    }
}

impl Serialize for MonthlyRollup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;

        for (month, bucket) in self.iter() {
            map.serialize_entry(&month_label(month), bucket)?;
        }

        map.end()
    }
}

/// The full English name of `month`, e.g. "January".
pub fn month_label(month: Month) -> String {
    month.to_string()
}

fn month_index(month: Month) -> usize {
    usize::from(u8::from(month)) - 1
}

/// Aggregates transaction amounts by month for the calendar year of
/// `year_reference`.
///
/// Transactions dated in any other year are skipped. Transactions with an
/// unrecognized type still create the bucket for their month but add nothing
/// to its sums.
pub fn aggregate_by_month(transactions: &[Transaction], year_reference: Date) -> MonthlyRollup {
    let year = year_reference.year();

    let rollup = transactions
        .iter()
        .filter(|transaction| transaction.date.year() == year)
        .fold(MonthlyRollup::empty(year), MonthlyRollup::record);

    tracing::debug!(
        "aggregated {} transactions into {} monthly buckets for {year}",
        transactions.len(),
        rollup.len()
    );

    rollup
}

#[cfg(test)]
mod tests {
    use time::{Date, Month, macros::date};

    use crate::{
        currency::CurrencyValue,
        transaction::{Transaction, TransactionFrequency, TransactionType},
        user::UserId,
    };

    use super::{MonthlyRollup, aggregate_by_month, month_label};

    fn create_test_transaction(
        amount: &str,
        transaction_type: TransactionType,
        date: Date,
    ) -> Transaction {
        Transaction {
            id: 0,
            title: "Test".to_owned(),
            amount: amount.parse().unwrap(),
            transaction_type,
            frequency: TransactionFrequency::Fixed,
            date,
            user_id: UserId::new(1),
        }
    }

    fn money(text: &str) -> CurrencyValue {
        text.parse().unwrap()
    }

    fn scenario_transactions() -> Vec<Transaction> {
        vec![
            create_test_transaction("1000", TransactionType::Income, date!(2024 - 01 - 05)),
            create_test_transaction("300", TransactionType::Expense, date!(2024 - 01 - 10)),
            create_test_transaction("500", TransactionType::Income, date!(2024 - 02 - 01)),
        ]
    }

    #[test]
    fn aggregate_by_month_sums_transactions() {
        let result = aggregate_by_month(&scenario_transactions(), date!(2024 - 06 - 15));

        assert_eq!(result.len(), 2);

        let january = result.get(Month::January).unwrap();
        assert_eq!(january.income_sum(), money("1000"));
        assert_eq!(january.expense_sum(), money("-300"));
        assert_eq!(january.total(), money("700"));

        let february = result.get(Month::February).unwrap();
        assert_eq!(february.income_sum(), money("500"));
        assert_eq!(february.expense_sum(), CurrencyValue::ZERO);
        assert_eq!(february.total(), money("500"));

        assert_eq!(result.get(Month::March), None);
    }

    #[test]
    fn aggregate_by_month_handles_empty_input() {
        let result = aggregate_by_month(&[], date!(2024 - 01 - 01));

        assert!(result.is_empty());
        assert_eq!(result.year(), 2024);
    }

    #[test]
    fn skips_transactions_from_other_years() {
        let transactions = vec![
            create_test_transaction("100", TransactionType::Income, date!(2023 - 12 - 31)),
            create_test_transaction("200", TransactionType::Income, date!(2024 - 12 - 31)),
            create_test_transaction("400", TransactionType::Income, date!(2025 - 01 - 01)),
        ];

        let result = aggregate_by_month(&transactions, date!(2024 - 03 - 03));

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(Month::December).unwrap().income_sum(), money("200"));
    }

    #[test]
    fn unknown_type_contributes_to_no_sum() {
        let transactions = vec![
            create_test_transaction("250", TransactionType::Income, date!(2024 - 03 - 02)),
            create_test_transaction(
                "999",
                TransactionType::Unrecognized("TRANSFER".to_owned()),
                date!(2024 - 03 - 09),
            ),
            create_test_transaction(
                "42",
                TransactionType::Unrecognized("TRANSFER".to_owned()),
                date!(2024 - 04 - 01),
            ),
        ];

        let result = aggregate_by_month(&transactions, date!(2024 - 01 - 01));

        let march = result.get(Month::March).unwrap();
        assert_eq!(march.income_sum(), money("250"));
        assert_eq!(march.expense_sum(), CurrencyValue::ZERO);
        assert_eq!(march.total(), money("250"));

        let april = result.get(Month::April).unwrap();
        assert_eq!(april.total(), CurrencyValue::ZERO);
    }

    #[test]
    fn bucket_total_is_income_plus_expense_sum() {
        let transactions = vec![
            create_test_transaction("10.01", TransactionType::Income, date!(2024 - 05 - 01)),
            create_test_transaction("3.33", TransactionType::Expense, date!(2024 - 05 - 02)),
            create_test_transaction("7.77", TransactionType::Expense, date!(2024 - 05 - 03)),
            create_test_transaction("0.10", TransactionType::Income, date!(2024 - 07 - 03)),
            create_test_transaction("0.20", TransactionType::Expense, date!(2024 - 07 - 04)),
        ];

        let result = aggregate_by_month(&transactions, date!(2024 - 01 - 01));

        for (month, bucket) in result.iter() {
            assert_eq!(
                bucket.total(),
                bucket.income_sum().add(bucket.expense_sum()),
                "inconsistent total for {month}"
            );
        }
        assert_eq!(result.get(Month::May).unwrap().total(), money("-1.09"));
        assert_eq!(result.get(Month::July).unwrap().total(), money("-0.10"));
    }

    #[test]
    fn aggregation_is_idempotent() {
        let transactions = scenario_transactions();
        let reference = date!(2024 - 01 - 01);

        assert_eq!(
            aggregate_by_month(&transactions, reference),
            aggregate_by_month(&transactions, reference)
        );
    }

    #[test]
    fn input_order_does_not_change_buckets() {
        let mut transactions = scenario_transactions();
        transactions.push(create_test_transaction(
            "75.25",
            TransactionType::Expense,
            date!(2024 - 02 - 20),
        ));
        let reference = date!(2024 - 01 - 01);
        let want = aggregate_by_month(&transactions, reference);

        let mut reversed = transactions.clone();
        reversed.reverse();
        let mut rotated = transactions.clone();
        rotated.rotate_left(2);

        assert_eq!(aggregate_by_month(&reversed, reference), want);
        assert_eq!(aggregate_by_month(&rotated, reference), want);
    }

    #[test]
    fn iterates_in_calendar_order() {
        // Newest first, the way the store returns them.
        let transactions = vec![
            create_test_transaction("1", TransactionType::Income, date!(2024 - 11 - 01)),
            create_test_transaction("1", TransactionType::Income, date!(2024 - 04 - 01)),
            create_test_transaction("1", TransactionType::Income, date!(2024 - 01 - 01)),
        ];

        let result = aggregate_by_month(&transactions, date!(2024 - 01 - 01));
        let months: Vec<Month> = result.iter().map(|(month, _)| month).collect();

        assert_eq!(months, vec![Month::January, Month::April, Month::November]);
    }

    #[test]
    fn serializes_month_labels_in_calendar_order() {
        let mut transactions = scenario_transactions();
        transactions.reverse();

        let json = serde_json::to_string(&aggregate_by_month(&transactions, date!(2024 - 01 - 01)))
            .unwrap();

        assert_eq!(
            json,
            "{\"January\":{\"expenseSum\":\"-300.00\",\"incomeSum\":\"1000.00\",\"total\":\"700.00\"},\
             \"February\":{\"expenseSum\":\"0.00\",\"incomeSum\":\"500.00\",\"total\":\"500.00\"}}"
        );
    }

    #[test]
    fn month_labels_are_full_names() {
        assert_eq!(month_label(Month::January), "January");
        assert_eq!(month_label(Month::September), "September");
    }

    #[test]
    fn empty_rollup_serializes_to_empty_map() {
        let json = serde_json::to_string(&MonthlyRollup::empty(2024)).unwrap();

        assert_eq!(json, "{}");
    }
}
