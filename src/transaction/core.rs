//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::TransactionId,
    transaction::format::{amount_format, date_format},
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub reason: String,
    /// A free text label such as "credit" or "debit".
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Whether the transaction has been reconciled against an external record.
    pub matched: bool,
}

/// The details needed to record a transaction.
///
/// New transactions always start out unmatched.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewTransaction {
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// The amount of money spent or earned.
    ///
    /// Accepts either a JSON number or a numeric string.
    #[serde(deserialize_with = "amount_format::deserialize")]
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub reason: String,
    /// A free text label such as "credit" or "debit".
    #[serde(rename = "type")]
    pub transaction_type: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    new_transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO transactions (date, amount, reason, type)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, date, amount, reason, type, matched",
        )?
        .query_row(
            (
                new_transaction.date,
                new_transaction.amount,
                &new_transaction.reason,
                &new_transaction.transaction_type,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve every transaction in the order they were created.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, date, amount, reason, type, matched FROM transactions ORDER BY id ASC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Insert many transactions in a single database transaction.
///
/// Either every transaction is inserted or, if any insert fails, none are.
///
/// Returns the number of transactions inserted.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error, in which case the
/// database is left unchanged.
pub fn import_transactions(
    new_transactions: Vec<NewTransaction>,
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    {
        // Prepare the insert statement once for reuse
        let mut statement = tx.prepare(
            "INSERT INTO transactions (date, amount, reason, type) VALUES (?1, ?2, ?3, ?4)",
        )?;

        for new_transaction in &new_transactions {
            statement.execute((
                new_transaction.date,
                new_transaction.amount,
                &new_transaction.reason,
                &new_transaction.transaction_type,
            ))?;
        }
    }

    tx.commit()?;

    Ok(new_transactions.len())
}

/// Flag a transaction as matched.
///
/// Matching an already matched transaction succeeds and leaves it matched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn mark_transaction_matched(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE transactions SET matched = TRUE WHERE id = ?1",
        (id,),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                reason TEXT NOT NULL,
                type TEXT NOT NULL,
                matched BOOLEAN NOT NULL DEFAULT FALSE
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let amount = row.get(2)?;
    let reason = row.get(3)?;
    let transaction_type = row.get(4)?;
    let matched = row.get(5)?;

    Ok(Transaction {
        id,
        date,
        amount,
        reason,
        transaction_type,
        matched,
    })
}

// ============================================================================
// TESTS
// ============================================================================
