//! Defines the endpoint for creating a new account.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    account::{Account, create_account, request::AccountRequest},
};

/// The state needed to create an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The database connection for managing accounts.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new account, responds with the created account.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    body: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let Json(request) = body?;
    let new_account = request.into_new_account()?;

    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let account = create_account(&new_account, &connection)?;
    tracing::info!("Created account {} ({})", account.number, account.id);

    Ok((StatusCode::CREATED, Json(account)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, log_in},
    };

    #[tokio::test]
    async fn can_create_account() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::ACCOUNTS)
            .add_cookie(cookie)
            .json(&json!({"number": 1000, "name": "Cash", "type": "Asset"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let account = response.json::<Value>();
        assert_eq!(account["number"], 1000);
        assert_eq!(account["name"], "Cash");
        assert_eq!(account["description"], "");
        assert_eq!(account["type"], "Asset");
        assert_eq!(account["id"].as_str().map(str::len), Some(24));
    }

    #[tokio::test]
    async fn duplicate_number_is_bad_request() {
        let server = get_test_server();
        let cookie = log_in(&server).await;
        server
            .post(endpoints::ACCOUNTS)
            .add_cookie(cookie.clone())
            .json(&json!({"number": 1000, "name": "Cash", "type": "Asset"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post(endpoints::ACCOUNTS)
            .add_cookie(cookie.clone())
            .json(&json!({"number": 1000, "name": "Petty cash", "type": "Asset"}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({"error": "an account with the number 1000 already exists"}));
        let accounts = server
            .get(endpoints::ACCOUNTS)
            .add_cookie(cookie)
            .await
            .json::<Value>();
        assert_eq!(accounts.as_array().map(Vec::len), Some(1));
        assert_eq!(accounts[0]["name"], "Cash");
    }

    #[tokio::test]
    async fn missing_fields_are_bad_request() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        let response = server
            .post(endpoints::ACCOUNTS)
            .add_cookie(cookie)
            .json(&json!({"name": "Cash"}))
            .await;

        response.assert_status_bad_request();
        response.assert_json(&json!({
            "error": "validation failed",
            "fields": [
                {"field": "number", "message": "is required"},
                {"field": "type", "message": "is required"},
            ],
        }));
    }

    #[tokio::test]
    async fn requires_session() {
        let server = get_test_server();

        let response = server
            .post(endpoints::ACCOUNTS)
            .json(&json!({"number": 1000, "name": "Cash", "type": "Asset"}))
            .await;

        response.assert_status_unauthorized();
    }
}
