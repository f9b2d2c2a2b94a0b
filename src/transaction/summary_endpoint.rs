//! Defines the endpoint for listing transactions.

use axum::{Json, extract::State};

use crate::{
    AppState, Error,
    db::lock_connection,
    transaction::{Transaction, get_all_transactions},
};

/// A route handler that responds with every transaction, oldest first.
pub async fn get_summary_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_all_transactions(&connection).map(Json)
}

#[cfg(test)]
mod summary_tests {
    use serde_json::{Value, json};

    use crate::{endpoints, test_utils::get_test_server};

    #[tokio::test]
    async fn summary_is_empty_array_with_no_transactions() {
        let server = get_test_server();

        let response = server.get(endpoints::SUMMARY).await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn summary_lists_transactions_in_order() {
        let server = get_test_server();
        for reason in ["first", "second", "third"] {
            server
                .post(endpoints::ADD_TRANSACTION)
                .json(&json!({
                    "date": "2024-01-01",
                    "amount": 1.5,
                    "reason": reason,
                    "type": "debit",
                }))
                .await
                .assert_status_ok();
        }

        let summary = server.get(endpoints::SUMMARY).await.json::<Vec<Value>>();

        let reasons: Vec<_> = summary.iter().map(|row| row["reason"].clone()).collect();
        assert_eq!(reasons, vec!["first", "second", "third"]);
        let ids: Vec<_> = summary.iter().map(|row| row["id"].clone()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
