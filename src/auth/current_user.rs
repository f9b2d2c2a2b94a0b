//! The per-request authentication context.

use axum::{
    Json,
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    account::{Account, AccountRepository, SQLiteAccountRepository},
    auth::get_token_from_cookies,
    db::lock_connection,
};

/// The account that made the current request.
///
/// Extracting this validates the auth cookie and loads the account it refers
/// to. Handlers that take a `CurrentUser` reject unauthenticated requests with
/// [Error::NotAuthenticated].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser(pub Account);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state)
            .await
            .map_err(|never| -> Error { match never {} })?;
        let token = get_token_from_cookies(&jar)?;

        let connection = lock_connection(&state.db_connection)?;
        let account = SQLiteAccountRepository::new(&connection)
            .find_by_id(token.user_id)
            .map_err(|error| match error {
                // The account in a validly signed token no longer exists.
                Error::NotFound => Error::NotAuthenticated,
                error => error,
            })?;

        Ok(CurrentUser(account))
    }
}

/// A route handler for getting the currently logged in account.
///
/// # Errors
///
/// Responds with 401 Unauthorized if the request has no valid auth cookie.
pub async fn get_current_user(CurrentUser(account): CurrentUser) -> Json<Value> {
    Json(json!({
        "status": "success",
        "user": account,
    }))
}
