//! Defines the journal entry models and the database queries for them.

use rusqlite::{
    Connection, Row, Transaction as SqlTransaction, TransactionBehavior, types::Type,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use time::Date;

use crate::{
    Error,
    db::is_unique_violation,
    journal::{TransId, allocate_next_trans_id},
    object_id::ObjectId,
};

// ============================================================================
// MODELS
// ============================================================================

/// One debit or credit against an account.
///
/// The account number and name are copied into the line, so the line reads
/// the same after the account is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalLine {
    /// The number of the account in the chart of accounts.
    pub account_number: i64,
    /// The name of the account when the line was written.
    pub account_name: String,
    /// The storage ID of the account, if the client linked one.
    pub account: Option<ObjectId>,
    /// The amount debited.
    pub debit: f64,
    /// The amount credited.
    pub credit: f64,
}

/// A document attached to a journal entry, e.g. a scanned receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// The file name.
    pub name: String,
    /// Where the file can be downloaded from.
    pub url: String,
    /// A free text tag, e.g. "receipt" or "invoice".
    pub category: String,
    /// The MIME type of the file, e.g. "application/pdf".
    pub mime_type: String,
}

/// A dated record of one bookkeeping transaction.
///
/// Debits and credits are stored as given, they are not required to balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The storage ID of the entry.
    pub id: ObjectId,
    /// The sequential ID of the entry, assigned when it is created.
    pub trans_id: TransId,
    /// When the transaction happened.
    #[serde(with = "crate::date_format")]
    pub date: Date,
    /// What the transaction was for.
    pub description: String,
    /// Supporting documents.
    pub attachments: Vec<Attachment>,
    /// The debits and credits.
    pub lines: Vec<JournalLine>,
}

/// The validated data for creating a [JournalEntry].
#[derive(Debug, Clone, PartialEq)]
pub struct NewJournalEntry {
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    pub description: String,
    /// Supporting documents.
    pub attachments: Vec<Attachment>,
    /// The debits and credits.
    pub lines: Vec<JournalLine>,
}

/// The validated changes to a [JournalEntry]. `None` keeps the stored value.
///
/// The transaction ID cannot be changed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JournalEntryUpdate {
    /// The new date.
    pub date: Option<Date>,
    /// The new description.
    pub description: Option<String>,
    /// Replaces all attachments.
    pub attachments: Option<Vec<Attachment>>,
    /// Replaces all lines.
    pub lines: Option<Vec<JournalLine>>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the journal entry table.
///
/// Attachments and lines are stored as JSON arrays in the entry's row.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_journal_entry_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS journal_entry (
            id TEXT PRIMARY KEY,
            trans_id INTEGER NOT NULL UNIQUE,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            attachments TEXT NOT NULL,
            lines TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_journal_entry_date ON journal_entry(date);",
    )?;

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string(value).map_err(|error| Error::JSONSerializationError(error.to_string()))
}

fn json_column<T: DeserializeOwned>(row: &Row, index: usize) -> Result<T, rusqlite::Error> {
    let text: String = row.get(index)?;

    serde_json::from_str(&text)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

fn map_row_to_journal_entry(row: &Row) -> Result<JournalEntry, rusqlite::Error> {
    Ok(JournalEntry {
        id: row.get(0)?,
        trans_id: TransId::new(row.get(1)?),
        date: row.get(2)?,
        description: row.get(3)?,
        attachments: json_column(row, 4)?,
        lines: json_column(row, 5)?,
    })
}

/// Insert a journal entry with an already allocated transaction ID.
///
/// Prefer [create_journal_entry], which allocates the ID in the same
/// database transaction.
///
/// # Errors
///
/// Returns [Error::DuplicateTransId] if `trans_id` is already in use, or
/// [Error::SqlError] if there is some other SQL error.
pub fn insert_journal_entry(
    trans_id: TransId,
    entry: &NewJournalEntry,
    connection: &Connection,
) -> Result<JournalEntry, Error> {
    let id = ObjectId::new();

    connection
        .execute(
            "INSERT INTO journal_entry (id, trans_id, date, description, attachments, lines)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                id,
                trans_id.as_i64(),
                entry.date,
                &entry.description,
                to_json(&entry.attachments)?,
                to_json(&entry.lines)?,
            ),
        )
        .map_err(|error| {
            if is_unique_violation(&error) {
                tracing::error!("transaction ID {trans_id} is already in use");
                Error::DuplicateTransId(trans_id)
            } else {
                error.into()
            }
        })?;

    Ok(JournalEntry {
        id,
        trans_id,
        date: entry.date,
        description: entry.description.clone(),
        attachments: entry.attachments.clone(),
        lines: entry.lines.clone(),
    })
}

/// Create a journal entry with the next transaction ID.
///
/// The ID is allocated and the entry inserted inside one immediate
/// transaction, so concurrent callers always get distinct IDs.
///
/// # Errors
///
/// Returns [Error::SqlError] if the journal could not be read or written.
pub fn create_journal_entry(
    entry: &NewJournalEntry,
    connection: &Connection,
) -> Result<JournalEntry, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let trans_id = allocate_next_trans_id(&transaction)?;
    let entry = insert_journal_entry(trans_id, entry, &transaction)?;

    transaction.commit()?;

    Ok(entry)
}

/// Get the journal entry with the storage ID `id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such entry.
pub fn get_journal_entry(id: ObjectId, connection: &Connection) -> Result<JournalEntry, Error> {
    connection
        .prepare(
            "SELECT id, trans_id, date, description, attachments, lines
             FROM journal_entry WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_journal_entry)
        .map_err(Error::from)
}

/// Get all journal entries, newest first.
///
/// Entries on the same date are ordered by descending transaction ID.
pub fn get_journal_entries(connection: &Connection) -> Result<Vec<JournalEntry>, Error> {
    connection
        .prepare(
            "SELECT id, trans_id, date, description, attachments, lines
             FROM journal_entry ORDER BY date DESC, trans_id DESC",
        )?
        .query_map([], map_row_to_journal_entry)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(Error::from)
}

/// Apply `update` to the journal entry with the storage ID `id` and return
/// the updated entry.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such entry.
pub fn update_journal_entry(
    id: ObjectId,
    update: &JournalEntryUpdate,
    connection: &Connection,
) -> Result<JournalEntry, Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Immediate)?;

    let existing = get_journal_entry(id, &transaction)?;
    let entry = JournalEntry {
        id,
        trans_id: existing.trans_id,
        date: update.date.unwrap_or(existing.date),
        description: update.description.clone().unwrap_or(existing.description),
        attachments: update.attachments.clone().unwrap_or(existing.attachments),
        lines: update.lines.clone().unwrap_or(existing.lines),
    };

    transaction.execute(
        "UPDATE journal_entry
         SET date = ?1, description = ?2, attachments = ?3, lines = ?4
         WHERE id = ?5",
        (
            entry.date,
            &entry.description,
            to_json(&entry.attachments)?,
            to_json(&entry.lines)?,
            id,
        ),
    )?;

    transaction.commit()?;

    Ok(entry)
}

type RowsAffected = usize;

/// Delete the journal entry with the storage ID `id`.
///
/// The transaction ID of a deleted entry is only reused if it was the
/// largest ID in use.
pub fn delete_journal_entry(id: ObjectId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM journal_entry WHERE id = :id", &[(":id", &id)])
        .map_err(Error::from)
}
