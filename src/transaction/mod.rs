//! Transactions and the endpoints for recording, listing and matching them.
//!
//! This module contains:
//! - The `Transaction` and `NewTransaction` models
//! - Database functions for storing, listing and matching transactions
//! - Route handlers for the transaction endpoints

mod add_endpoint;
mod core;
mod format;
mod match_endpoint;
mod summary_endpoint;

pub use add_endpoint::add_transaction_endpoint;
pub use core::{
    NewTransaction, Transaction, count_transactions, create_transaction,
    create_transaction_table, get_all_transactions, import_transactions,
    mark_transaction_matched,
};
pub(crate) use format::{parse_amount, parse_date};
pub use match_endpoint::mark_matched_endpoint;
pub use summary_endpoint::get_summary_endpoint;
