//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model, its type and frequency tags
//! - Validation of new transactions
//! - Route handlers for creating, reading and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    NewTransaction, Transaction, TransactionForm, TransactionFrequency, TransactionType,
};
pub use create_endpoint::{CreateTransactionState, create_transaction_endpoint};
pub use delete_endpoint::{DeleteTransactionState, delete_transaction_endpoint};
pub use list_endpoint::{
    ListTransactionsState, get_transaction_endpoint, list_transactions_endpoint,
};
