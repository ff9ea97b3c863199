//! Defines the endpoints for listing accounts and fetching a single account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, get_account, get_accounts},
    object_id::ObjectId,
};

/// The state needed to read accounts.
#[derive(Debug, Clone)]
pub struct GetAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that lists the chart of accounts ordered by account number.
pub async fn get_accounts_endpoint(
    State(state): State<GetAccountState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_accounts(&connection).map(Json)
}

/// A route handler that returns a single account.
///
/// The ID is checked before the database is accessed.
pub async fn get_account_endpoint(
    State(state): State<GetAccountState>,
    Path(account_id): Path<String>,
) -> Result<Json<Account>, Error> {
    let account_id: ObjectId = account_id.parse()?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_account(account_id, &connection).map(Json)
}
