//! The API endpoints URIs.
//!
//! For endpoints that take parameters, e.g., '/api/users/{user_id}/dashboard', use [format_endpoint].

/// The route for a user's dashboard data.
pub const DASHBOARD_API: &str = "/api/users/{user_id}/dashboard";
/// The route to list and create a user's transactions.
pub const TRANSACTIONS_API: &str = "/api/users/{user_id}/transactions";
/// The route to access a single transaction.
pub const TRANSACTION_API: &str = "/api/users/{user_id}/transactions/{transaction_id}";

/// Replace the parameters in `endpoint_path` with `ids`, in order.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters.
/// Parameters without a matching ID are left as is, and extra IDs are ignored.
pub fn format_endpoint(endpoint_path: &str, ids: &[i64]) -> String {
    let mut formatted = String::with_capacity(endpoint_path.len());
    let mut rest = endpoint_path;
    let mut ids = ids.iter();

    while let Some(param_start) = rest.find('{') {
        let Some(param_len) = rest[param_start..].find('}') else {
            break;
        };

        let Some(id) = ids.next() else {
            break;
        };

        formatted.push_str(&rest[..param_start]);
        formatted.push_str(&id.to_string());
        rest = &rest[param_start + param_len + 1..];
    }

    formatted.push_str(rest);
    formatted
}
