use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    stores::{TransactionStore, sqlite::SQLiteTransactionStore},
    user::UserId,
};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The store for managing transactions.
    transaction_store: SQLiteTransactionStore,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

/// A route handler for deleting a transaction, responds with no content.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
) -> Result<StatusCode, Error> {
    state
        .transaction_store
        .delete(transaction_id, user_id)
        .inspect_err(|error| {
            tracing::debug!("Could not delete transaction {transaction_id}: {error}")
        })?;

    Ok(StatusCode::NO_CONTENT)
}
