//! Defines the endpoint for deleting a journal entry.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, journal::delete_journal_entry, object_id::ObjectId};

/// The state needed to delete a journal entry.
#[derive(Debug, Clone)]
pub struct DeleteJournalEntryState {
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteJournalEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a journal entry, responds with 204 No Content.
pub async fn delete_journal_entry_endpoint(
    State(state): State<DeleteJournalEntryState>,
    Path(entry_id): Path<String>,
) -> Result<StatusCode, Error> {
    let entry_id: ObjectId = entry_id.parse()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match delete_journal_entry(entry_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => {
            tracing::info!("Deleted journal entry {entry_id}");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
