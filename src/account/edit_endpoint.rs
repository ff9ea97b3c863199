//! Defines the endpoint for updating an account
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, request::AccountRequest, update_account},
    object_id::ObjectId,
};

/// The state needed to edit an account.
#[derive(Debug, Clone)]
pub struct EditAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating an account, responds with the updated account.
///
/// Fields missing from the body keep their stored values.
pub async fn edit_account_endpoint(
    State(state): State<EditAccountState>,
    Path(account_id): Path<String>,
    body: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<Account>, Error> {
    let account_id: ObjectId = account_id.parse()?;
    let Json(request) = body?;
    let update = request.into_update()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    update_account(account_id, &update, &connection)
        .inspect_err(|error| tracing::debug!("Could not update account {account_id}: {error}"))
        .map(Json)
}
