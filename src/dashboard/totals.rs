//! Per-type sums shared by the monthly rollup and the 30-day windows.

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::{
    currency::CurrencyValue,
    transaction::{Transaction, TransactionType},
};

/// The income and expense sums for a set of transactions.
///
/// Both sums are kept as non-negative magnitudes so there is a single sign
/// convention internally. [TypeTotals::expense_sum] reports expenses with
/// their economic (negative) sign, and the total is `income - expenses`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeTotals {
    income: CurrencyValue,
    expenses: CurrencyValue,
}

impl TypeTotals {
    /// Sum `transactions` by type.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(TypeTotals::default(), TypeTotals::record)
    }

    /// Add a single transaction to the sums.
    ///
    /// Transactions with an unrecognized type leave the sums unchanged.
    pub fn record(self, transaction: &Transaction) -> Self {
        match transaction.transaction_type {
            TransactionType::Expense => Self {
                expenses: self.expenses.add(transaction.amount),
                ..self
            },
            TransactionType::Income => Self {
                income: self.income.add(transaction.amount),
                ..self
            },
            TransactionType::Unrecognized(_) => self,
        }
    }

    /// The total earned.
    pub fn income_sum(&self) -> CurrencyValue {
        self.income
    }

    /// The total spent with its economic sign, always zero or negative.
    pub fn expense_sum(&self) -> CurrencyValue {
        self.expenses.negate()
    }

    /// The net result, income minus expenses.
    pub fn total(&self) -> CurrencyValue {
        self.income.subtract(self.expenses)
    }
}

impl Serialize for TypeTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TypeTotals", 3)?;
        state.serialize_field("expenseSum", &self.expense_sum())?;
        state.serialize_field("incomeSum", &self.income_sum())?;
        state.serialize_field("total", &self.total())?;
        state.end()
    }
}
