//! Implements a SQLite backed account repository.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    account::{Account, AccountId, AccountRecord, AccountRepository, NewAccount, PasswordHash},
};

/// Handles the creation and retrieval of accounts stored in SQLite.
///
/// The repository borrows a connection, so it lives only as long as the
/// request that acquired the connection.
#[derive(Debug, Clone, Copy)]
pub struct SQLiteAccountRepository<'a> {
    connection: &'a Connection,
}

impl<'a> SQLiteAccountRepository<'a> {
    /// Create a new account repository.
    pub fn new(connection: &'a Connection) -> Self {
        Self { connection }
    }
}

impl AccountRepository for SQLiteAccountRepository<'_> {
    /// Get the account that uses `email`, or `None` if such an account does not exist.
    ///
    /// # Errors
    ///
    /// Returns an [Error::SqlError] if there are SQL related errors.
    fn find(&self, email: &str) -> Result<Option<AccountRecord>, Error> {
        self.connection
            .prepare("SELECT id, name, email, password_hash FROM accounts WHERE email = :email")?
            .query_row(&[(":email", &email)], map_account_record_row)
            .optional()
            .map_err(|error| error.into())
    }

    /// Get the account that has the specified `id`.
    ///
    /// # Errors
    ///
    /// Returns a [Error::NotFound] error if there is no account with the specified ID or
    /// [Error::SqlError] if there are SQL related errors.
    fn find_by_id(&self, id: AccountId) -> Result<Account, Error> {
        self.connection
            .prepare("SELECT id, name, email, password_hash FROM accounts WHERE id = :id")?
            .query_row(&[(":id", &id.as_i64())], map_account_record_row)
            .map(|record| record.account)
            .map_err(|error| error.into())
    }

    /// Create and insert a new account into the database.
    ///
    /// # Errors
    ///
    /// Returns a [Error::DuplicateEmail] if the email is already registered or
    /// [Error::SqlError] if an SQL related error occurred.
    fn insert(&self, new_account: NewAccount) -> Result<Account, Error> {
        self.connection.execute(
            "INSERT INTO accounts (name, email, password_hash) VALUES (?1, ?2, ?3)",
            (
                &new_account.name,
                &new_account.email,
                new_account.password_hash.as_ref(),
            ),
        )?;

        let id = AccountId::new(self.connection.last_insert_rowid());

        Ok(Account {
            id,
            name: new_account.name,
            email: new_account.email,
        })
    }
}

/// Create the account table.
///
/// `AUTOINCREMENT` guarantees that IDs are never reused.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

fn map_account_record_row(row: &Row) -> Result<AccountRecord, rusqlite::Error> {
    let raw_id = row.get(0)?;
    let name = row.get(1)?;
    let email = row.get(2)?;
    let raw_password_hash: String = row.get(3)?;

    Ok(AccountRecord {
        account: Account {
            id: AccountId::new(raw_id),
            name,
            email,
        },
        password_hash: PasswordHash::new_unchecked(&raw_password_hash),
    })
}

#[cfg(test)]
mod sqlite_account_repository_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        account::{
            AccountId, AccountRepository, NewAccount, PasswordHash, SQLiteAccountRepository,
            create_account_table,
        },
    };

    fn get_db_connection() -> Connection {
        let conn =
            Connection::open_in_memory().expect("Could not create in-memory SQLite database");
        create_account_table(&conn).expect("Could not create account table");

        conn
    }

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Foo".to_owned(),
            email: email.to_owned(),
            password_hash: PasswordHash::from_raw_password("hunter2"),
        }
    }

    #[test]
    fn insert_account_succeeds() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);

        let inserted = repository.insert(new_account("foo@bar.baz")).unwrap();

        assert_eq!(inserted.id, AccountId::new(1));
        assert_eq!(inserted.email, "foo@bar.baz");
    }

    #[test]
    fn insert_fails_with_duplicate_email() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);
        repository.insert(new_account("foo@bar.baz")).unwrap();

        let result = repository.insert(new_account("foo@bar.baz"));

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[test]
    fn find_returns_stored_hash() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);
        let inserted = repository.insert(new_account("foo@bar.baz")).unwrap();

        let record = repository.find("foo@bar.baz").unwrap().unwrap();

        assert_eq!(record.account, inserted);
        assert!(record.password_hash.verify("hunter2"));
    }

    #[test]
    fn find_returns_none_for_unknown_email() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);

        assert_eq!(repository.find("nobody@bar.baz"), Ok(None));
    }

    #[test]
    fn find_by_id_fails_with_non_existent_id() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);

        assert_eq!(
            repository.find_by_id(AccountId::new(42)),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn ids_are_not_reused_after_failed_insert() {
        let conn = get_db_connection();
        let repository = SQLiteAccountRepository::new(&conn);
        repository.insert(new_account("a@bar.baz")).unwrap();
        repository.insert(new_account("a@bar.baz")).unwrap_err();

        let second = repository.insert(new_account("b@bar.baz")).unwrap();

        assert_eq!(second.id, AccountId::new(2));
    }
}
