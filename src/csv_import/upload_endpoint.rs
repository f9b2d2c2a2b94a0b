//! Defines the endpoint for importing transactions from a CSV file.

use std::time::Instant;

use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    AppState, Error,
    csv_import::{ImportError, parse_csv},
    db::lock_connection,
    transaction::import_transactions,
};

/// The name of the multipart form field that holds the CSV file.
const FILE_FIELD: &str = "file";

/// Route handler for importing transactions from an uploaded CSV file.
///
/// The whole file is parsed before anything is written, and the rows are
/// inserted in a single database transaction, so a bad row means nothing is
/// imported.
///
/// # Errors
///
/// Responds with 400 Bad Request if the form has no file, the file is not
/// UTF-8, or any row cannot be parsed. Responds with 413 Payload Too Large if
/// the form is bigger than the request body limit.
pub async fn upload_csv_endpoint(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, Error> {
    let start_time = Instant::now();
    let mut csv_data = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(FILE_FIELD) {
            csv_data = Some(read_csv_field(field).await?);
            break;
        }
    }

    let csv_data = csv_data.ok_or(ImportError::MissingFile)?;
    let transactions = parse_csv(&csv_data)
        .inspect_err(|error| tracing::debug!("Failed to parse CSV: {error}"))?;

    let imported = {
        let connection = lock_connection(&state.db_connection)?;
        import_transactions(transactions, &connection)?
    };

    tracing::info!(
        "Imported {imported} transactions in {:.1}ms",
        start_time.elapsed().as_secs_f64() * 1000.0
    );

    Ok(Json(json!({
        "status": "uploaded",
        "imported": imported,
    })))
}

async fn read_csv_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field.file_name().unwrap_or("<unnamed>").to_owned();

    let data = field.bytes().await.map_err(multipart_error)?;

    tracing::debug!("Received file '{}' that is {} bytes", file_name, data.len());

    String::from_utf8(data.to_vec()).map_err(|_| ImportError::NotUtf8.into())
}

fn multipart_error(error: MultipartError) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Rejected multipart form: {error}");
        return Error::PayloadTooLarge;
    }

    tracing::debug!("Could not read multipart form: {error}");
    Error::MultipartError(error.body_text())
}
