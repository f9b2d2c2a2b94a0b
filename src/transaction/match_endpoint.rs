//! Defines the endpoint for flagging a transaction as matched.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState, Error, TransactionId,
    db::lock_connection,
    transaction::mark_transaction_matched,
};

/// A route handler for marking a transaction as matched.
///
/// # Errors
///
/// Responds with 404 Not Found if no transaction has the ID `transaction_id`.
pub async fn mark_matched_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<Value>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    mark_transaction_matched(transaction_id, &connection).inspect_err(|error| {
        tracing::debug!("Could not mark transaction {transaction_id} as matched: {error}")
    })?;

    Ok(Json(json!({ "status": "success" })))
}
