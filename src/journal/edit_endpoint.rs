//! Defines the endpoint for updating a journal entry.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    journal::{JournalEntry, request::JournalEntryRequest, update_journal_entry},
    object_id::ObjectId,
};

/// The state needed to edit a journal entry.
#[derive(Debug, Clone)]
pub struct EditJournalEntryState {
    /// The database connection for managing journal entries.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditJournalEntryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating a journal entry, responds with the updated entry.
///
/// Fields missing from the body keep their stored values and the
/// transaction ID never changes.
pub async fn edit_journal_entry_endpoint(
    State(state): State<EditJournalEntryState>,
    Path(entry_id): Path<String>,
    body: Result<Json<JournalEntryRequest>, JsonRejection>,
) -> Result<Json<JournalEntry>, Error> {
    let entry_id: ObjectId = entry_id.parse()?;
    let Json(request) = body?;
    let update = request.into_update()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    update_journal_entry(entry_id, &update, &connection).map(Json)
}
