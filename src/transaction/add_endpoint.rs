//! Defines the endpoint for recording a single transaction.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    db::lock_connection,
    transaction::{NewTransaction, create_transaction},
};

/// A route handler for creating a new transaction.
///
/// The request body is a JSON object with the fields `date` (YYYY-MM-DD),
/// `amount` (a number or numeric string), `reason` and `type`. Other fields
/// are ignored.
///
/// # Errors
///
/// Responds with a 4xx status if the body cannot be decoded and 500 Internal
/// Server Error if the transaction could not be stored.
pub async fn add_transaction_endpoint(
    State(state): State<AppState>,
    Json(new_transaction): Json<NewTransaction>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let transaction = create_transaction(new_transaction, &connection)?;

    tracing::debug!("Created transaction {}", transaction.id);

    Ok(Json(json!({ "status": "success" })))
}
