#![allow(missing_docs)]

use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};

use crate::{
    AppState, TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_PASSWORD, auth::COOKIE_TOKEN, build_router,
    endpoints, seed_test_account,
};

/// Create app state backed by a fresh in-memory database that already holds
/// the test account.
pub(crate) fn get_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    let state = AppState::new(connection, "42").expect("Could not create app state");

    seed_test_account(&state.db_connection.lock().unwrap())
        .expect("Could not create test account");

    state
}

/// Get a test server for the full application router.
pub(crate) fn get_test_server() -> TestServer {
    TestServer::new(build_router(get_test_state())).expect("Could not create test server")
}

/// Sign up an account and return its public details as JSON.
pub(crate) async fn sign_up_test_account(
    server: &TestServer,
    name: &str,
    email: &str,
    password: &str,
) -> Value {
    let response = server
        .post(endpoints::SIGN_UP)
        .json(&json!({
            "name": name,
            "email": email,
            "password": password,
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()["user"].clone()
}

/// Log in as the seeded test account and return the auth cookie.
pub(crate) async fn log_in_test_account(server: &TestServer) -> Cookie<'static> {
    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({
            "email": TEST_ACCOUNT_EMAIL,
            "password": TEST_ACCOUNT_PASSWORD,
        }))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_TOKEN)
}
