//! The route handler for logging out.

use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;
use serde_json::{Value, json};

use crate::{AppState, auth::invalidate_auth_cookie};

/// Invalidate the auth cookie, logging out the current user.
///
/// Succeeds even if the client was not logged in.
pub async fn post_log_out(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<Value>) {
    (
        invalidate_auth_cookie(jar, state.secure_cookies),
        Json(json!({ "status": "success" })),
    )
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::StatusCode;

    use crate::{
        auth::COOKIE_TOKEN,
        endpoints,
        test_utils::{get_test_server, log_in_test_account},
    };

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie() {
        let server = get_test_server();
        let auth_cookie = log_in_test_account(&server).await;

        let response = server.post(endpoints::LOG_OUT).add_cookie(auth_cookie).await;

        response.assert_status_ok();
        let cleared_cookie = response.cookie(COOKIE_TOKEN);
        server
            .get(endpoints::CURRENT_USER)
            .add_cookie(cleared_cookie)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
