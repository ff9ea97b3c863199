//! The chart of accounts and how accounts are stored.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::{Error, db::is_unique_violation, object_id::ObjectId};

/// A named, numbered category that journal lines are posted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The storage ID of the account.
    pub id: ObjectId,
    /// The chart of accounts code, e.g. 1000 for cash. Unique.
    pub number: i64,
    /// The name of the account.
    pub name: String,
    /// A longer description of what the account is for.
    pub description: String,
    /// The kind of account, by convention one of Asset, Liability, Equity,
    /// Revenue or Expense.
    #[serde(rename = "type")]
    pub account_type: String,
}

/// The validated data for creating an [Account].
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The chart of accounts code.
    pub number: i64,
    /// The name of the account.
    pub name: String,
    /// A longer description of what the account is for.
    pub description: String,
    /// The kind of account.
    pub account_type: String,
}

/// The validated changes to an [Account]. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccountUpdate {
    /// The new chart of accounts code.
    pub number: Option<i64>,
    /// The new name.
    pub name: Option<String>,
    /// The new description.
    pub description: Option<String>,
    /// The new kind of account.
    pub account_type: Option<String>,
}

/// Create the account table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id TEXT PRIMARY KEY,
            number INTEGER NOT NULL UNIQUE,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            account_type TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn map_row_to_account(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        number: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        account_type: row.get(4)?,
    })
}

fn map_unique_violation(error: rusqlite::Error, number: i64) -> Error {
    if is_unique_violation(&error) {
        Error::DuplicateAccountNumber(number)
    } else {
        error.into()
    }
}

/// Create a new account with a fresh storage ID.
///
/// # Errors
///
/// Returns [Error::DuplicateAccountNumber] if an account with the same number
/// exists, or [Error::SqlError] if there was some other SQL error.
pub fn create_account(account: &NewAccount, connection: &Connection) -> Result<Account, Error> {
    let id = ObjectId::new();

    connection
        .execute(
            "INSERT INTO account (id, number, name, description, account_type)
            VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                id,
                account.number,
                &account.name,
                &account.description,
                &account.account_type,
            ),
        )
        .map_err(|error| map_unique_violation(error, account.number))?;

    Ok(Account {
        id,
        number: account.number,
        name: account.name.clone(),
        description: account.description.clone(),
        account_type: account.account_type.clone(),
    })
}

/// Get the account with the storage ID `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such account.
pub fn get_account(id: ObjectId, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(
            "SELECT id, number, name, description, account_type FROM account WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_account)
        .map_err(Error::from)
}

/// Get all accounts, ordered by account number.
pub fn get_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(
            "SELECT id, number, name, description, account_type FROM account ORDER BY number ASC",
        )?
        .query_map([], map_row_to_account)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Apply `update` to the account with the storage ID `id` and return the
/// updated account.
///
/// # Errors
///
/// Returns:
/// - [Error::NotFound] if there is no such account.
/// - [Error::DuplicateAccountNumber] if the new number is used by another
///   account, in which case nothing is changed.
pub fn update_account(
    id: ObjectId,
    update: &AccountUpdate,
    connection: &Connection,
) -> Result<Account, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let existing = get_account(id, &transaction)?;
    let account = Account {
        id,
        number: update.number.unwrap_or(existing.number),
        name: update.name.clone().unwrap_or(existing.name),
        description: update.description.clone().unwrap_or(existing.description),
        account_type: update.account_type.clone().unwrap_or(existing.account_type),
    };

    transaction
        .execute(
            "UPDATE account
            SET number = ?1, name = ?2, description = ?3, account_type = ?4
            WHERE id = ?5",
            (
                account.number,
                &account.name,
                &account.description,
                &account.account_type,
                id,
            ),
        )
        .map_err(|error| map_unique_violation(error, account.number))?;

    transaction.commit()?;

    Ok(account)
}

type RowsAffected = usize;

/// Delete the account with the storage ID `id`.
///
/// Journal lines that reference the account are left as they are.
pub fn delete_account(id: ObjectId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
