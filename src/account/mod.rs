//! Accounts: credentials storage plus the sign up and log in endpoints.

mod core;
mod log_in_endpoint;
mod password;
mod repository;
mod sign_up_endpoint;
mod sqlite;

pub use core::{Account, AccountId, AccountRecord, NewAccount, log_in, sign_up};
pub use log_in_endpoint::post_log_in;
pub use password::PasswordHash;
pub use repository::{AccountRepository, InMemoryAccountRepository};
pub use sign_up_endpoint::post_sign_up;
pub use sqlite::{SQLiteAccountRepository, create_account_table};
