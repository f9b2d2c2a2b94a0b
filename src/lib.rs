//! A small ledger backend for recording and reconciling transactions.
//!
//! Accounts can sign up and log in, transactions can be added one at a time or
//! imported in bulk from CSV files, and each transaction can be flagged as
//! matched once it has been reconciled against an external record.
//!
//! This library provides a JSON API built on axum and SQLite.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod csv_import;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use account::{
    Account, AccountId, AccountRecord, AccountRepository, InMemoryAccountRepository, NewAccount,
    PasswordHash, SQLiteAccountRepository, log_in, sign_up,
};
pub use app_state::{AppState, create_cookie_key};
pub use csv_import::{ImportError, parse_csv};
pub use database_id::{DatabaseId, TransactionId};
pub use db::{
    TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_NAME, TEST_ACCOUNT_PASSWORD, initialize as initialize_db,
    seed_test_account,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_LOGGED_RESPONSE_SIZE, logging_middleware};
pub use routing::{build_cors_layer, build_router};
pub use transaction::{
    NewTransaction, Transaction, count_transactions, create_transaction, get_all_transactions,
    import_transactions, mark_transaction_matched,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email used to sign up already belongs to an account.
    #[error("the email is already registered")]
    DuplicateEmail,

    /// The sign up request was missing details needed to create an account.
    #[error("invalid sign up details: {0}")]
    InvalidSignup(String),

    /// The email and password did not match a registered account.
    ///
    /// Unknown emails and wrong passwords both produce this error so that
    /// clients cannot discover which emails are registered.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request did not carry a valid auth token.
    #[error("the request is not authenticated")]
    NotAuthenticated,

    /// A CSV upload could not be imported.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// The multipart form could not be read.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// The request body was larger than the server accepts.
    #[error("the request body is too large")]
    PayloadTooLarge,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows or an
    /// update affects no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// The inner error is only logged on the server, clients receive a
    /// generic message.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    && desc.ends_with("accounts.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_owned(),
            ),
            Error::InvalidSignup(reason) => (StatusCode::BAD_REQUEST, reason.to_owned()),
            Error::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_owned())
            }
            Error::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not logged in".to_owned()),
            Error::Import(error) => (StatusCode::BAD_REQUEST, error.to_string()),
            Error::MultipartError(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large".to_owned(),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "The requested resource could not be found".to_owned(),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (
            status,
            Json(json!({
                "status": "error",
                "message": message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{body, http::StatusCode, response::IntoResponse};
    use serde_json::Value;

    use crate::{Error, ImportError};

    async fn into_status_and_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Could not read response body");

        (status, serde_json::from_slice(&body).expect("Body is not JSON"))
    }

    #[tokio::test]
    async fn duplicate_email_is_bad_request() {
        let (status, body) = into_status_and_json(Error::DuplicateEmail).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Email already registered");
    }

    #[tokio::test]
    async fn import_error_names_the_line() {
        let error = Error::Import(ImportError::MissingField {
            line: 3,
            column: "amount",
        });

        let (status, body) = into_status_and_json(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["message"].as_str().unwrap();
        assert!(message.contains("line 3"), "got message {message}");
        assert!(message.contains("amount"), "got message {message}");
    }

    #[tokio::test]
    async fn sql_error_message_is_not_sent_to_client() {
        let error = Error::SqlError(rusqlite::Error::InvalidQuery);

        let (status, body) = into_status_and_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["message"].as_str().unwrap();
        assert!(!message.contains("Query"), "got message {message}");
    }

    #[tokio::test]
    async fn payload_too_large_is_413() {
        let (status, body) = into_status_and_json(Error::PayloadTooLarge).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["status"], "error");
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
