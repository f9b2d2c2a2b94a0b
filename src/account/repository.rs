//! Defines the account repository trait and an in-memory implementation.

use std::{collections::HashMap, sync::Mutex};

use crate::{
    Error,
    account::{Account, AccountId, AccountRecord, NewAccount},
};

/// Handles the creation and retrieval of accounts.
pub trait AccountRepository {
    /// Get an account and its credentials by email.
    ///
    /// Returns `Ok(None)` if no account uses `email`.
    fn find(&self, email: &str) -> Result<Option<AccountRecord>, Error>;

    /// Get an account by its ID.
    ///
    /// Returns [Error::NotFound] if no account has the ID `id`.
    fn find_by_id(&self, id: AccountId) -> Result<Account, Error>;

    /// Store a new account and assign it the next sequential ID.
    ///
    /// Returns [Error::DuplicateEmail] if the email is already registered.
    fn insert(&self, account: NewAccount) -> Result<Account, Error>;
}

#[derive(Debug, Default)]
struct InMemoryAccounts {
    by_email: HashMap<String, AccountRecord>,
    last_id: i64,
}

/// An account repository that keeps accounts in memory.
///
/// Accounts are lost when the repository is dropped.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<InMemoryAccounts>,
}

impl InMemoryAccountRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryAccounts>, Error> {
        self.accounts.lock().map_err(|error| {
            tracing::error!("could not acquire account repository lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl AccountRepository for InMemoryAccountRepository {
    fn find(&self, email: &str) -> Result<Option<AccountRecord>, Error> {
        Ok(self.lock()?.by_email.get(email).cloned())
    }

    fn find_by_id(&self, id: AccountId) -> Result<Account, Error> {
        self.lock()?
            .by_email
            .values()
            .find(|record| record.account.id == id)
            .map(|record| record.account.clone())
            .ok_or(Error::NotFound)
    }

    fn insert(&self, new_account: NewAccount) -> Result<Account, Error> {
        let mut accounts = self.lock()?;

        if accounts.by_email.contains_key(&new_account.email) {
            return Err(Error::DuplicateEmail);
        }

        accounts.last_id += 1;
        let account = Account {
            id: AccountId::new(accounts.last_id),
            name: new_account.name,
            email: new_account.email,
        };
        accounts.by_email.insert(
            account.email.clone(),
            AccountRecord {
                account: account.clone(),
                password_hash: new_account.password_hash,
            },
        );

        Ok(account)
    }
}
