//! Bookkeeper is a web app for keeping the books of a small business.
//!
//! This library provides a JSON REST API for a chart of accounts and
//! double-entry journal entries. Users sign in with a Google ID token and
//! are then tracked with an encrypted session cookie.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod config;
mod date_format;
mod db;
mod endpoints;
mod journal;
mod logging;
mod object_id;
mod routing;
mod validation;

#[cfg(test)]
mod test_utils;

pub use account::{
    Account, AccountUpdate, NewAccount, create_account, delete_account, get_account,
    get_accounts, update_account,
};
pub use app_state::AppState;
pub use auth::{
    DEFAULT_COOKIE_DURATION, GoogleTokenVerifier, IdTokenVerifier, IdentityProfile, User, UserID,
    get_user_by_id, upsert_user,
};
pub use config::ClientConfig;
pub use db::initialize as initialize_db;
pub use journal::{
    Attachment, JournalEntry, JournalEntryUpdate, JournalLine, NewJournalEntry, TransId,
    allocate_next_trans_id, create_journal_entry, delete_journal_entry, get_journal_entries,
    get_journal_entry, insert_journal_entry, update_journal_entry,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use object_id::{InvalidObjectId, ObjectId};
pub use routing::build_router;
pub use validation::{FieldError, ValidationErrors};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of the request body are invalid.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// A storage identifier in the request path is not 24 hexadecimal characters.
    ///
    /// This is checked before the database is accessed.
    #[error(transparent)]
    InvalidObjectId(#[from] InvalidObjectId),

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("could not parse the request body: {0}")]
    MalformedBody(String),

    /// An account with the same number already exists.
    ///
    /// The existing account is left unmodified.
    #[error("an account with the number {0} already exists")]
    DuplicateAccountNumber(i64),

    /// The request does not carry a valid session cookie.
    #[error("authentication required")]
    NotAuthenticated,

    /// The identity provider rejected the ID token, or the token was issued
    /// for a different client.
    #[error("invalid ID token: {0}")]
    InvalidIdToken(String),

    /// The identity provider could not be reached or sent an unexpected response.
    #[error("could not verify the ID token with the identity provider: {0}")]
    IdentityProvider(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A journal entry was inserted with a transaction ID that is already in use.
    ///
    /// This only happens when two IDs are allocated before either entry is
    /// inserted, see [allocate_next_trans_id]. Clients see it as a generic
    /// server error, the ID itself is only logged.
    #[error("an internal server error occurred")]
    DuplicateTransId(TransId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The session cookie could not be created.
    #[error("could not create the session cookie: {0}")]
    CookieError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),
}

impl Error {
    /// The HTTP status code that this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::InvalidObjectId(_)
            | Error::MalformedBody(_)
            | Error::DuplicateAccountNumber(_) => StatusCode::BAD_REQUEST,
            Error::NotAuthenticated | Error::InvalidIdToken(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateTransId(_)
            | Error::IdentityProvider(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::CookieError(_)
            | Error::JSONSerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::MalformedBody(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        } else {
            tracing::debug!("Rejecting request: {}", self);
        }

        // Server errors pass the raw message through to the client, which
        // includes SQL error text.
        let body = match self {
            Error::Validation(errors) => json!({
                "error": "validation failed",
                "fields": errors,
            }),
            error => json!({ "error": error.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use serde_json::{Value, json};

    use crate::{Error, InvalidObjectId, TransId, ValidationErrors};

    async fn response_json(error: Error) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let mut errors = ValidationErrors::new();
        errors.add("description", "is required");

        let (status, body) = response_json(Error::Validation(errors)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "validation failed",
                "fields": [{"field": "description", "message": "is required"}],
            })
        );
    }

    #[tokio::test]
    async fn invalid_object_id_is_bad_request() {
        let (status, body) =
            response_json(InvalidObjectId("123".to_owned()).into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "\"123\" is not a valid ID, expected 24 hexadecimal characters"
        );
    }

    #[tokio::test]
    async fn duplicate_account_number_is_bad_request() {
        let (status, _) = response_json(Error::DuplicateAccountNumber(1000)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_authenticated_is_unauthorized() {
        let (status, _) = response_json(Error::NotAuthenticated).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn duplicate_trans_id_is_generic_server_error() {
        let (status, body) = response_json(Error::DuplicateTransId(TransId::new(3))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "an internal server error occurred"}));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }
}
