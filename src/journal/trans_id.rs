//! Sequential transaction IDs for journal entries.
//!
//! The next ID is one more than the largest ID in use. Allocation is a read
//! followed by an insert, so two allocations made before either entry is
//! inserted return the same ID and the second insert fails with
//! [Error::DuplicateTransId]. [create_journal_entry] avoids this by
//! allocating and inserting inside one immediate transaction.
//!
//! [create_journal_entry]: crate::journal::create_journal_entry

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The sequential, human facing ID of a journal entry.
///
/// Not to be confused with the storage ID of the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransId(i64);

impl TransId {
    /// The ID of the first journal entry.
    pub const FIRST: TransId = TransId(1);

    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// The ID after this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for TransId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Get the transaction ID for the next journal entry.
///
/// This is [TransId::FIRST] if there are no journal entries, otherwise one
/// more than the largest transaction ID in use.
///
/// # Errors
///
/// Returns [Error::SqlError] if the journal could not be read.
pub fn allocate_next_trans_id(connection: &Connection) -> Result<TransId, Error> {
    let latest: Option<i64> = connection
        .query_row(
            "SELECT trans_id FROM journal_entry ORDER BY trans_id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    Ok(latest.map_or(TransId::FIRST, |id| TransId::new(id).next()))
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, initialize_db,
        journal::{JournalLine, NewJournalEntry, create_journal_entry, insert_journal_entry},
    };

    use super::{TransId, allocate_next_trans_id};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).unwrap();
        connection
    }

    fn new_entry(description: &str) -> NewJournalEntry {
        NewJournalEntry {
            date: date!(2025 - 03 - 01),
            description: description.to_owned(),
            attachments: Vec::new(),
            lines: vec![JournalLine {
                account_number: 1000,
                account_name: "Cash".to_owned(),
                account: None,
                debit: 10.0,
                credit: 0.0,
            }],
        }
    }

    #[test]
    fn first_id_is_one() {
        let connection = get_test_connection();

        assert_eq!(allocate_next_trans_id(&connection), Ok(TransId::new(1)));
    }

    #[test]
    fn ids_are_allocated_in_creation_order() {
        let connection = get_test_connection();

        let ids: Vec<i64> = (0..5)
            .map(|i| {
                create_journal_entry(&new_entry(&format!("Entry {i}")), &connection)
                    .unwrap()
                    .trans_id
                    .as_i64()
            })
            .collect();

        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn next_id_follows_largest_id_not_count() {
        let connection = get_test_connection();
        insert_journal_entry(TransId::new(41), &new_entry("Imported"), &connection).unwrap();

        assert_eq!(allocate_next_trans_id(&connection), Ok(TransId::new(42)));
    }

    #[test]
    fn allocations_before_insert_collide() {
        let connection = get_test_connection();

        let first = allocate_next_trans_id(&connection).unwrap();
        let second = allocate_next_trans_id(&connection).unwrap();
        assert_eq!(first, second);

        insert_journal_entry(first, &new_entry("First"), &connection).unwrap();
        let result = insert_journal_entry(second, &new_entry("Second"), &connection);

        assert_eq!(result, Err(Error::DuplicateTransId(second)));
    }
}
