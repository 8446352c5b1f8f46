//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    AppState, Error, ValidationError,
    stores::{TransactionStore, sqlite::SQLiteTransactionStore},
    timezone::local_today,
    transaction::{Transaction, TransactionForm},
    user::UserId,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store for saving the new transaction.
    pub transaction_store: SQLiteTransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction, responds with the created
/// transaction.
///
/// A form without a date is recorded for today in the server's timezone.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Path(user_id): Path<UserId>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Transaction>), Error> {
    let Json(form) = form.map_err(|rejection| {
        tracing::debug!("rejected request body for user {user_id}: {rejection}");
        ValidationError::InvalidRequestBody(rejection.body_text())
    })?;
    let today = local_today(&state.local_timezone)?;

    let new_transaction = form
        .validate(user_id, today)
        .inspect_err(|error| tracing::debug!("rejected transaction for user {user_id}: {error}"))?;

    let transaction = state.transaction_store.create(new_transaction)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}
