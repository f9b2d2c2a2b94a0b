//! Database setup shared by the account and transaction tables.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, TransactionBehavior};

use crate::{
    Error,
    account::{
        Account, AccountRepository, NewAccount, PasswordHash, SQLiteAccountRepository,
        create_account_table,
    },
    transaction::create_transaction_table,
};

/// The display name of the account created by [seed_test_account].
pub const TEST_ACCOUNT_NAME: &str = "Test User";
/// The email of the account created by [seed_test_account].
pub const TEST_ACCOUNT_EMAIL: &str = "test@example.com";
/// The password of the account created by [seed_test_account].
pub const TEST_ACCOUNT_PASSWORD: &str = "password123";

/// Create the all of the database tables for the application.
///
/// Existing tables are left untouched, so this is safe to call on every start-up.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        rusqlite::Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Insert the well-known test account if it does not exist yet.
///
/// On a fresh database this account is the first one created and gets ID 1.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn seed_test_account(connection: &Connection) -> Result<Account, Error> {
    let repository = SQLiteAccountRepository::new(connection);

    if let Some(record) = repository.find(TEST_ACCOUNT_EMAIL)? {
        return Ok(record.account);
    }

    let account = repository.insert(NewAccount {
        name: TEST_ACCOUNT_NAME.to_owned(),
        email: TEST_ACCOUNT_EMAIL.to_owned(),
        password_hash: PasswordHash::from_raw_password(TEST_ACCOUNT_PASSWORD),
    })?;

    tracing::info!("Created test account with ID {}", account.id);

    Ok(account)
}

/// Acquire the shared database connection for the duration of a request.
///
/// The connection is released when the returned guard is dropped.
///
/// # Errors
/// Returns an [Error::DatabaseLockError] if the lock is poisoned.
pub(crate) fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}

#[cfg(test)]
mod db_tests {
    use rusqlite::Connection;

    use crate::{
        AccountId,
        db::{TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_NAME, initialize, seed_test_account},
    };

    #[test]
    fn initialize_twice_succeeds() {
        let conn = Connection::open_in_memory().unwrap();

        initialize(&conn).expect("First initialization failed");
        initialize(&conn).expect("Second initialization failed");
    }

    #[test]
    fn seeded_account_gets_first_id() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let account = seed_test_account(&conn).unwrap();

        assert_eq!(account.id, AccountId::new(1));
        assert_eq!(account.name, TEST_ACCOUNT_NAME);
        assert_eq!(account.email, TEST_ACCOUNT_EMAIL);
    }

    #[test]
    fn seeding_twice_returns_existing_account() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let first = seed_test_account(&conn).unwrap();

        let second = seed_test_account(&conn).unwrap();

        assert_eq!(first, second);
    }
}
