use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use bookkeeper_rs::{
    JournalLine, NewAccount, NewJournalEntry, create_account, create_journal_entry, initialize_db,
};

/// A utility for creating a test database for the REST API server of bookkeeper_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// A small chart of accounts: number, name and type.
const ACCOUNTS: [(i64, &str, &str); 6] = [
    (1000, "Cash", "Asset"),
    (1200, "Accounts receivable", "Asset"),
    (2000, "Accounts payable", "Liability"),
    (3000, "Owner's equity", "Equity"),
    (4000, "Sales", "Revenue"),
    (5000, "Rent", "Expense"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating chart of accounts...");

    for (number, name, account_type) in ACCOUNTS {
        create_account(
            &NewAccount {
                number,
                name: name.to_owned(),
                description: String::new(),
                account_type: account_type.to_owned(),
            },
            &conn,
        )?;
    }

    println!("Creating journal entries...");

    let entries = [
        (date!(2025 - 01 - 01), "Owner's investment", 3000, "Owner's equity", 10_000.0),
        (date!(2025 - 01 - 03), "January rent", 5000, "Rent", 1_500.0),
    ];

    for (date, description, account_number, account_name, amount) in entries {
        let entry = create_journal_entry(
            &NewJournalEntry {
                date,
                description: description.to_owned(),
                attachments: Vec::new(),
                lines: vec![
                    JournalLine {
                        account_number: 1000,
                        account_name: "Cash".to_owned(),
                        account: None,
                        debit: if account_number == 3000 { amount } else { 0.0 },
                        credit: if account_number == 3000 { 0.0 } else { amount },
                    },
                    JournalLine {
                        account_number,
                        account_name: account_name.to_owned(),
                        account: None,
                        debit: if account_number == 3000 { 0.0 } else { amount },
                        credit: if account_number == 3000 { amount } else { 0.0 },
                    },
                ],
            },
            &conn,
        )?;
        println!("  #{} {}", entry.trans_id, entry.description);
    }

    println!("Success!");

    Ok(())
}
