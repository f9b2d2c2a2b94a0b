use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{
    TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_PASSWORD, import_transactions, initialize_db, parse_csv,
    seed_test_account,
};

/// A utility for creating a test database for the API server of ledger_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// A CSV file of transactions to import into the new database.
    #[arg(long)]
    csv: Option<PathBuf>,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test account...");
    let account = seed_test_account(&conn)?;
    println!(
        "Log in as {TEST_ACCOUNT_EMAIL} with the password {TEST_ACCOUNT_PASSWORD} (account ID {}).",
        account.id
    );

    if let Some(csv_path) = args.csv {
        println!("Importing transactions from {csv_path:#?}...");
        let text = fs::read_to_string(&csv_path)?;
        let transactions = parse_csv(&text)?;
        let imported = import_transactions(transactions, &conn)?;
        println!("Imported {imported} transactions.");
    }

    println!("Success!");

    Ok(())
}
