//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, Row, params_from_iter, types::Value};

use crate::{
    Error,
    database_id::TransactionId,
    stores::{TransactionQuery, TransactionStore},
    transaction::{NewTransaction, Transaction},
    user::UserId,
};

const TRANSACTION_COLUMNS: &str = "id, title, amount, type, frequency, date, user_id";

/// Stores transactions in a SQLite database.
///
/// The transaction table must exist, see [create_transaction_table].
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// Create a new transaction in the database.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] if there is an SQL error.
    fn create(&self, transaction: NewTransaction) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let transaction = connection
            .prepare(&format!(
                "INSERT INTO \"transaction\" (title, amount, type, frequency, date, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING {TRANSACTION_COLUMNS}"
            ))?
            .query_row(
                (
                    transaction.title(),
                    transaction.amount(),
                    transaction.transaction_type(),
                    transaction.frequency(),
                    transaction.date(),
                    transaction.user_id(),
                ),
                map_transaction_row,
            )?;

        tracing::debug!(
            "created transaction {} for user {}",
            transaction.id,
            transaction.user_id
        );

        Ok(transaction)
    }

    /// Retrieve a transaction in the database by its `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction owned by `user_id`,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get(&self, id: TransactionId, user_id: UserId) -> Result<Transaction, Error> {
        let transaction = self
            .lock()?
            .prepare(&format!(
                "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = ?1 AND user_id = ?2"
            ))?
            .query_row((id, user_id), map_transaction_row)?;

        Ok(transaction)
    }

    /// Query for a user's transactions, newest first.
    ///
    /// Transactions on the same date are ordered by ID, newest first.
    ///
    /// # Errors
    /// This function will return a [Error::SqlError] there is a SQL error.
    fn fetch_transactions(
        &self,
        user_id: UserId,
        query: TransactionQuery,
    ) -> Result<Vec<Transaction>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(user_id.as_i64())];

        if let Some(start) = query.start {
            where_clause_parts.push(format!("date >= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(start.to_string()));
        }

        if let Some(end) = query.end {
            where_clause_parts.push(format!("date <= ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Text(end.to_string()));
        }

        let query_string = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE {} ORDER BY date DESC, id DESC",
            where_clause_parts.join(" AND ")
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query_string)?;

        statement
            .query_map(params_from_iter(query_parameters.iter()), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
            .collect()
    }

    /// Delete a transaction owned by `user_id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingTransaction] if there is no such transaction for the user,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete(&self, id: TransactionId, user_id: UserId) -> Result<(), Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, user_id),
        )?;

        match rows_affected {
            0 => Err(Error::DeleteMissingTransaction),
            _ => Ok(()),
        }
    }
}

/// Create the transaction table in the database.
///
/// `type` and `frequency` are free text so that rows written with tags this
/// build does not know about can still be read.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                amount TEXT NOT NULL,
                type TEXT NOT NULL,
                frequency TEXT NOT NULL,
                date TEXT NOT NULL,
                user_id INTEGER NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    // Every dashboard query filters on the owner and a date range.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        transaction_type: row.get(3)?,
        frequency: row.get(4)?,
        date: row.get(5)?,
        user_id: row.get(6)?,
    })
}
