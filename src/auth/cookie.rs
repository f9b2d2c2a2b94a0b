//! Defines functions for handling user authentication with cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, account::AccountId, auth::Token};

/// The name of the cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "auth_token";

/// Add an auth cookie to the cookie jar, indicating that a user is logged in and authenticated.
///
/// The cookie has no expiry, so it lasts until the client ends the session or logs out.
/// It is only marked `Secure` when `secure` is true.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::JSONSerializationError] if the token cannot be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: AccountId,
    secure: bool,
) -> Result<PrivateCookieJar, Error> {
    let token = serde_json::to_string(&Token { user_id })
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(secure),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar, secure: bool) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(secure),
    )
}

/// Read the token from the auth cookie in `jar`.
///
/// # Errors
///
/// Returns [Error::NotAuthenticated] if the cookie is missing, could not be
/// decrypted, or does not hold a valid token.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::NotAuthenticated)?;

    serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("Could not parse auth token: {error}");
        Error::NotAuthenticated
    })
}
