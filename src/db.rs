//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, account::create_account_table, auth::create_user_table,
    journal::create_journal_entry_table,
};

/// Create the tables for the domain models if they do not exist yet.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created,
/// in which case none of them are.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_account_table(&transaction)?;
    create_journal_entry_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Whether `error` was caused by a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::SqliteFailure(error, _)
            if error.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
