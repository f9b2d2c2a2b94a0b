//! Defines the account models and the sign up and log in operations.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{AccountRepository, PasswordHash},
};

// ============================================================================
// MODELS
// ============================================================================

/// A newtype wrapper for integer account IDs.
///
/// This helps disambiguate account IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct AccountId(i64);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the account ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The public details of an account.
///
/// This is what gets sent to clients, it never includes the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account's ID in the application database.
    pub id: AccountId,
    /// The display name of the account holder.
    pub name: String,
    /// The email used to log in.
    pub email: String,
}

/// An account together with its stored credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    /// The public details of the account.
    pub account: Account,
    /// The hash of the account's password.
    pub password_hash: PasswordHash,
}

/// The details needed to create an account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The display name of the account holder.
    pub name: String,
    /// The email used to log in, must not belong to another account.
    pub email: String,
    /// The hash of the account's password.
    pub password_hash: PasswordHash,
}

// ============================================================================
// OPERATIONS
// ============================================================================

/// Create a new account.
///
/// Surrounding whitespace is trimmed from `email` before it is checked and
/// stored. The password is hashed before it is stored and the new account is
/// assigned the next sequential ID.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidSignup] if `email` or `password` is empty,
/// - [Error::DuplicateEmail] if `email` already belongs to an account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn sign_up(
    name: &str,
    email: &str,
    password: &str,
    repository: &impl AccountRepository,
) -> Result<Account, Error> {
    let email = email.trim();

    if email.is_empty() || password.is_empty() {
        return Err(Error::InvalidSignup(
            "Email and password are required".to_owned(),
        ));
    }

    if repository.find(email)?.is_some() {
        return Err(Error::DuplicateEmail);
    }

    repository.insert(NewAccount {
        name: name.to_owned(),
        email: email.to_owned(),
        password_hash: PasswordHash::from_raw_password(password),
    })
}

/// Check an email and password against the stored credentials.
///
/// `email` is trimmed the same way as in [sign_up].
///
/// # Errors
/// Returns [Error::InvalidCredentials] if the email is not registered or the
/// password is wrong. The two cases are deliberately indistinguishable.
pub fn log_in(
    email: &str,
    password: &str,
    repository: &impl AccountRepository,
) -> Result<Account, Error> {
    match repository.find(email.trim())? {
        Some(record) if record.password_hash.verify(password) => Ok(record.account),
        _ => Err(Error::InvalidCredentials),
    }
}

// ============================================================================
// TESTS
// ============================================================================
