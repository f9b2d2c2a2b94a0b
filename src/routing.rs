//! Application router configuration.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::{
    AppState, Error,
    account::{post_log_in, post_sign_up},
    auth::{get_current_user, post_log_out},
    csv_import::upload_csv_endpoint,
    endpoints,
    transaction::{add_transaction_endpoint, get_summary_endpoint, mark_matched_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let account_routes = Router::new()
        .route(endpoints::SIGN_UP, post(post_sign_up))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::CURRENT_USER, get(get_current_user));

    let transaction_routes = Router::new()
        .route(endpoints::ADD_TRANSACTION, post(add_transaction_endpoint))
        .route(endpoints::SUMMARY, get(get_summary_endpoint))
        .route(endpoints::UPLOAD, post(upload_csv_endpoint))
        .route(endpoints::MATCH_TRANSACTION, put(mark_matched_endpoint));

    Router::new()
        .route(endpoints::ROOT, get(get_index))
        .merge(account_routes)
        .merge(transaction_routes)
        .fallback(get_not_found)
        .with_state(state)
}

/// CORS rules for a browser client served from another origin.
///
/// The client sends the auth cookie with its requests, so the request origin
/// is echoed back with `Access-Control-Allow-Credentials: true`. Browsers
/// reject credentialed responses that use the `*` wildcard.
pub fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// The root path '/' reports that the server is up.
async fn get_index() -> &'static str {
    "Backend is running!"
}

async fn get_not_found() -> Error {
    Error::NotFound
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{Method, StatusCode};
    use axum_test::TestServer;
    use serde_json::{Value, json};

    use crate::{
        TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_PASSWORD, build_router,
        endpoints::{self, format_endpoint},
        routing::build_cors_layer,
        test_utils::{get_test_server, get_test_state, sign_up_test_account},
    };

    const CLIENT_ORIGIN: &str = "http://localhost:3000";

    fn get_cors_test_server() -> TestServer {
        TestServer::new(build_router(get_test_state()).layer(build_cors_layer()))
            .expect("Could not create test server")
    }

    #[tokio::test]
    async fn cross_origin_log_in_allows_credentials() {
        let server = get_cors_test_server();

        let response = server
            .post(endpoints::LOG_IN)
            .add_header("origin", CLIENT_ORIGIN)
            .json(&json!({
                "email": TEST_ACCOUNT_EMAIL,
                "password": TEST_ACCOUNT_PASSWORD,
            }))
            .await;

        response.assert_status_ok();
        response.assert_header("access-control-allow-origin", CLIENT_ORIGIN);
        response.assert_header("access-control-allow-credentials", "true");
    }

    #[tokio::test]
    async fn preflight_mirrors_origin_with_credentials() {
        let server = get_cors_test_server();

        let response = server
            .method(Method::OPTIONS, endpoints::ADD_TRANSACTION)
            .add_header("origin", CLIENT_ORIGIN)
            .add_header("access-control-request-method", "POST")
            .add_header("access-control-request-headers", "content-type")
            .await;

        response.assert_status_ok();
        response.assert_header("access-control-allow-origin", CLIENT_ORIGIN);
        response.assert_header("access-control-allow-credentials", "true");
        response.assert_header("access-control-allow-methods", "POST");
    }

    #[tokio::test]
    async fn root_reports_backend_is_running() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        response.assert_text("Backend is running!");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/api/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>()["status"], "error");
    }

    #[tokio::test]
    async fn sign_up_add_and_match_end_to_end() {
        let server = get_test_server();

        let user = sign_up_test_account(&server, "A", "a@x.com", "p1").await;
        assert_eq!(user["id"], 2);

        server
            .post(endpoints::ADD_TRANSACTION)
            .json(&json!({
                "date": "2024-01-01",
                "amount": 100,
                "reason": "gift",
                "type": "credit",
            }))
            .await
            .assert_status_ok();

        let summary = server.get(endpoints::SUMMARY).await.json::<Vec<Value>>();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0]["matched"], false);
        let id = summary[0]["id"].as_i64().unwrap();

        server
            .put(&format_endpoint(endpoints::MATCH_TRANSACTION, id))
            .await
            .assert_status_ok();

        let summary = server.get(endpoints::SUMMARY).await.json::<Vec<Value>>();
        assert_eq!(
            summary,
            vec![json!({
                "id": id,
                "date": "2024-01-01",
                "amount": 100.0,
                "reason": "gift",
                "type": "credit",
                "matched": true,
            })]
        );
    }
}
