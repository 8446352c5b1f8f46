use axum::{body::Body, http::Response};
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::Value;

use crate::{AppState, build_router};

/// An [AppState] over a fresh in-memory database, in UTC.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(connection, "Etc/UTC").expect("Could not create app state")
}

/// A test server running the full router over `state`.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).expect("Could not create test server.")
}

/// Read the body of `response` as JSON.
pub(crate) async fn response_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not JSON")
}
