//! Parses transactions from header-delimited CSV text.
//!
//! The header must name the columns `date`, `amount`, `reason` and `type`.
//! Header names are matched case-insensitively, may appear in any order, and
//! any other columns are ignored.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::transaction::{NewTransaction, parse_amount, parse_date};

const DATE_COLUMN: &str = "date";
const AMOUNT_COLUMN: &str = "amount";
const REASON_COLUMN: &str = "reason";
const TYPE_COLUMN: &str = "type";

/// The reasons a CSV upload could not be imported.
///
/// Line numbers are 1-based and count the header, so the first data row is on
/// line 2.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ImportError {
    /// The upload did not include a form field named "file".
    #[error("no file was uploaded, expected a multipart field named \"file\"")]
    MissingFile,

    /// The uploaded file could not be decoded as UTF-8 text.
    #[error("the uploaded file is not valid UTF-8 text")]
    NotUtf8,

    /// The header does not contain one of the required columns.
    #[error("the CSV header is missing the \"{0}\" column")]
    MissingColumn(&'static str),

    /// A data row has no value for a required column.
    #[error("line {line}: missing value for \"{column}\"")]
    MissingField {
        /// The line the row starts on.
        line: u64,
        /// The name of the column without a value.
        column: &'static str,
    },

    /// A data row has a date or amount that could not be parsed.
    #[error("line {line}: invalid value \"{value}\" for \"{column}\"")]
    InvalidField {
        /// The line the row starts on.
        line: u64,
        /// The name of the column with the bad value.
        column: &'static str,
        /// The text that could not be parsed.
        value: String,
    },

    /// The CSV reader could not read a record, e.g. an unterminated quote.
    #[error("could not read CSV: {0}")]
    Malformed(String),
}

/// The positions of the required columns in the header.
struct ColumnIndices {
    date: usize,
    amount: usize,
    reason: usize,
    transaction_type: usize,
}

impl ColumnIndices {
    fn from_header(header: &StringRecord) -> Result<Self, ImportError> {
        let find = |name: &'static str| {
            header
                .iter()
                // Spreadsheet exports often start with a byte order mark.
                .position(|column| column.trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
                .ok_or(ImportError::MissingColumn(name))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            amount: find(AMOUNT_COLUMN)?,
            reason: find(REASON_COLUMN)?,
            transaction_type: find(TYPE_COLUMN)?,
        })
    }
}

/// Parse every data row of `text` into a transaction.
///
/// Blank lines are skipped and a file with only a header yields no
/// transactions. Parsing stops at the first bad row, so callers either get
/// every row or an error naming the line and column at fault.
///
/// # Errors
/// Returns an [ImportError] describing the first problem found.
pub fn parse_csv(text: &str) -> Result<Vec<NewTransaction>, ImportError> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let header = reader
        .headers()
        .map_err(|error| ImportError::Malformed(error.to_string()))?;
    let columns = ColumnIndices::from_header(header)?;

    let mut transactions = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|error| ImportError::Malformed(error.to_string()))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        let line = record.position().map_or(0, |position| position.line());
        transactions.push(parse_record(&record, &columns, line)?);
    }

    Ok(transactions)
}

fn parse_record(
    record: &StringRecord,
    columns: &ColumnIndices,
    line: u64,
) -> Result<NewTransaction, ImportError> {
    let get = |index: usize, column: &'static str| match record.get(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ImportError::MissingField { line, column }),
    };

    let date_text = get(columns.date, DATE_COLUMN)?;
    let date = parse_date(date_text).map_err(|_| ImportError::InvalidField {
        line,
        column: DATE_COLUMN,
        value: date_text.to_owned(),
    })?;

    let amount_text = get(columns.amount, AMOUNT_COLUMN)?;
    let amount = parse_amount(amount_text).ok_or_else(|| ImportError::InvalidField {
        line,
        column: AMOUNT_COLUMN,
        value: amount_text.to_owned(),
    })?;

    Ok(NewTransaction {
        date,
        amount,
        reason: get(columns.reason, REASON_COLUMN)?.to_owned(),
        transaction_type: get(columns.transaction_type, TYPE_COLUMN)?.to_owned(),
    })
}
