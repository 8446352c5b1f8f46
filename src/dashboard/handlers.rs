//! Dashboard HTTP handlers.

use axum::{
    Json,
    extract::{FromRef, Path, State},
};

use crate::{
    AppState, Error,
    dashboard::view::{DashboardView, build_dashboard},
    stores::sqlite::SQLiteTransactionStore,
    timezone::local_today,
    user::UserId,
};

/// The state needed for building the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store for reading the user's transactions.
    pub transaction_store: SQLiteTransactionStore,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Get the monthly rollup and 30-day change statistics for a user.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<DashboardView>, Error> {
    let today = local_today(&state.local_timezone)?;

    build_dashboard(&state.transaction_store, user_id, today)
        .inspect_err(|error| tracing::error!("could not build dashboard for user {user_id}: {error}"))
        .map(Json)
}
