//! The route handler for creating accounts.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    account::{SQLiteAccountRepository, sign_up},
    db::lock_connection,
};

/// The JSON body of a sign up request.
#[derive(Debug, Deserialize)]
pub struct SignUpData {
    /// The display name for the new account.
    #[serde(default)]
    pub name: String,
    /// The email to log in with.
    pub email: String,
    /// The plaintext password, hashed before it is stored.
    pub password: String,
}

/// A route handler for creating a new account.
///
/// Responds with the public details of the new account.
///
/// # Errors
///
/// Responds with 400 Bad Request if the email is already registered or the
/// email or password is empty.
pub async fn post_sign_up(
    State(state): State<AppState>,
    Json(sign_up_data): Json<SignUpData>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let account = sign_up(
        &sign_up_data.name,
        &sign_up_data.email,
        &sign_up_data.password,
        &SQLiteAccountRepository::new(&connection),
    )
    .inspect_err(|error| tracing::debug!("Sign up failed: {error}"))?;

    tracing::info!("Created account {}", account.id);

    Ok(Json(json!({
        "status": "success",
        "user": account,
    })))
}
