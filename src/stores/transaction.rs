//! Defines the transaction store trait.

use std::ops::RangeInclusive;

use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{NewTransaction, Transaction},
    user::UserId,
};

/// Handles the creation and retrieval of a user's transactions.
///
/// Every method is scoped to a single user: asking for another user's
/// transaction behaves exactly like asking for one that does not exist.
pub trait TransactionStore {
    /// Save a new transaction in the store.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error>;

    /// Retrieve a transaction from the store.
    fn get(&self, id: TransactionId, user_id: UserId) -> Result<Transaction, Error>;

    /// Retrieve the user's transactions within the bounds of `query`, sorted
    /// by date descending.
    fn fetch_transactions(
        &self,
        user_id: UserId,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error>;

    /// Remove a transaction from the store.
    fn delete(&self, id: TransactionId, user_id: UserId) -> Result<(), Error>;
}

/// Defines which transactions [TransactionStore::fetch_transactions] returns.
///
/// Both bounds are inclusive. A missing bound leaves that side unfiltered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TransactionQuery {
    /// Include transactions on or after this date.
    pub start: Option<Date>,
    /// Include transactions on or before this date.
    pub end: Option<Date>,
}

impl TransactionQuery {
    /// A query for every transaction within `date_range`.
    pub fn within(date_range: RangeInclusive<Date>) -> Self {
        Self {
            start: Some(*date_range.start()),
            end: Some(*date_range.end()),
        }
    }
}
