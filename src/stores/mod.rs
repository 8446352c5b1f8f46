//! Contains the trait and SQLite implementation for the store that supplies
//! transactions to the dashboard.

mod transaction;

pub mod sqlite;

pub use transaction::{TransactionQuery, TransactionStore};
