//! Defines the endpoints for listing journal entries and fetching a single entry.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    journal::{JournalEntry, get_journal_entries, get_journal_entry},
    object_id::ObjectId,
};

/// The state needed to read journal entries.
#[derive(Debug, Clone)]
pub struct GetJournalState {
    /// The database connection for managing journal entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetJournalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists the journal, newest entries first.
pub async fn get_journal_entries_endpoint(
    State(state): State<GetJournalState>,
) -> Result<Json<Vec<JournalEntry>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_journal_entries(&connection).map(Json)
}

/// A route handler that returns a single journal entry.
///
/// A malformed ID is rejected before the database is accessed.
pub async fn get_journal_entry_endpoint(
    State(state): State<GetJournalState>,
    Path(entry_id): Path<String>,
) -> Result<Json<JournalEntry>, Error> {
    let entry_id: ObjectId = entry_id.parse()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_journal_entry(entry_id, &connection).map(Json)
}
