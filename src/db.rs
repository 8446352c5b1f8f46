//! Sets up the application database.

use rusqlite::Connection;

use crate::{Error, stores::sqlite::create_transaction_table};

/// Create the tables for the domain models if they do not already exist.
///
/// Safe to call on every start up.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = connection.unchecked_transaction()?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
