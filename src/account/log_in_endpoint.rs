//! The route handler for logging in.
//!
//! The auth module handles the lower level token and cookie logic.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    account::{SQLiteAccountRepository, log_in},
    auth::set_auth_cookie,
    db::lock_connection,
};

/// The JSON body of a log in request.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request the auth cookie is set and the account's
/// public details are returned.
///
/// # Errors
///
/// Responds with 401 Unauthorized if the email is not registered or the
/// password is wrong. Both cases produce the same response.
pub async fn post_log_in(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Json(log_in_data): Json<LogInData>,
) -> Result<(PrivateCookieJar, Json<Value>), Error> {
    let account = {
        let connection = lock_connection(&state.db_connection)?;

        log_in(
            &log_in_data.email,
            &log_in_data.password,
            &SQLiteAccountRepository::new(&connection),
        )?
    };

    let jar = set_auth_cookie(jar, account.id, state.secure_cookies)?;
    tracing::info!("Account {} logged in", account.id);

    Ok((
        jar,
        Json(json!({
            "status": "success",
            "user": account,
        })),
    ))
}
