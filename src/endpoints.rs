//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}/match', tests use `format_endpoint`.

/// The root route which reports that the server is running.
pub const ROOT: &str = "/";

/// The route for creating a new account.
pub const SIGN_UP: &str = "/api/signup";
/// The route for logging in.
pub const LOG_IN: &str = "/api/login";
/// The route for logging out the current user.
pub const LOG_OUT: &str = "/api/logout";
/// The route for getting the currently logged in account.
pub const CURRENT_USER: &str = "/api/me";
/// The route for adding a single transaction.
pub const ADD_TRANSACTION: &str = "/api/add";
/// The route for listing all transactions.
pub const SUMMARY: &str = "/api/summary";
/// The route to upload a CSV file of transactions.
pub const UPLOAD: &str = "/api/upload";
/// The route to mark a transaction as matched.
pub const MATCH_TRANSACTION: &str = "/api/transactions/{transaction_id}/match";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
#[cfg(test)]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let param_start = match endpoint_path.find('{') {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
