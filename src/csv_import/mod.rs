//! Bulk import of transactions from CSV files.

mod csv;
mod upload_endpoint;

pub use csv::{ImportError, parse_csv};
pub use upload_endpoint::upload_csv_endpoint;
