//! Defines the endpoints for reading a user's transactions.

use axum::{
    Json,
    extract::{FromRef, Path, Query, State},
};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    stores::{TransactionQuery, TransactionStore, sqlite::SQLiteTransactionStore},
    transaction::Transaction,
    user::UserId,
};

/// The state needed to read transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The store for reading transactions.
    pub transaction_store: SQLiteTransactionStore,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

/// A route handler for listing a user's transactions, newest first.
///
/// The optional `start` and `end` query parameters are inclusive date bounds,
/// e.g. `?start=2024-01-01&end=2024-01-31`.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<Transaction>>, Error> {
    state
        .transaction_store
        .fetch_transactions(user_id, query)
        .map(Json)
}

/// A route handler for getting a single transaction owned by the user.
pub async fn get_transaction_endpoint(
    State(state): State<ListTransactionsState>,
    Path((user_id, transaction_id)): Path<(UserId, TransactionId)>,
) -> Result<Json<Transaction>, Error> {
    state
        .transaction_store
        .get(transaction_id, user_id)
        .map(Json)
}
