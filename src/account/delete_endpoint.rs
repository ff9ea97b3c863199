//! Defines the endpoint for deleting an account.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{AppState, Error, account::delete_account, object_id::ObjectId};

/// The state needed to delete an account.
#[derive(Debug, Clone)]
pub struct DeleteAccountState {
    /// The database connection for managing account.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an account, responds with 204 No Content.
pub async fn delete_account_endpoint(
    State(state): State<DeleteAccountState>,
    Path(account_id): Path<String>,
) -> Result<StatusCode, Error> {
    let account_id: ObjectId = account_id.parse()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match delete_account(account_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => {
            tracing::info!("Deleted account {account_id}");
            Ok(StatusCode::NO_CONTENT)
        }
    }
}
