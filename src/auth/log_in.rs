//! Route handlers for signing in with a Google ID token, signing out and
//! fetching the signed in user.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error, ValidationErrors,
    auth::{
        IdTokenVerifier, User, UserID,
        cookie::{invalidate_auth_cookie, set_auth_cookie},
        get_user_by_id, upsert_user,
    },
};

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Verifies the ID tokens that clients sign in with.
    pub token_verifier: Arc<dyn IdTokenVerifier>,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            token_verifier: state.token_verifier.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The body of a Google sign-in request.
#[derive(Debug, Deserialize)]
pub struct GoogleLogInRequest {
    /// The ID token the client received from Google.
    pub token: Option<String>,
}

/// Handler for signing in with a Google ID token.
///
/// On success the user's profile is stored, the auth cookie is set and the
/// user is returned.
///
/// # Errors
///
/// Responds with:
/// - 400 if the body is malformed or the token is missing.
/// - 401 if the identity provider does not vouch for the token.
/// - 500 if the identity provider could not be reached or the user could not be stored.
pub async fn post_google_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    body: Result<Json<GoogleLogInRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(request) => request,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    let token = match request.token.as_deref().map(str::trim) {
        Some(token) if !token.is_empty() => token.to_owned(),
        _ => {
            let mut errors = ValidationErrors::new();
            errors.add("token", "is required");
            return Error::from(errors).into_response();
        }
    };

    let profile = match state.token_verifier.verify(&token).await {
        Ok(profile) => profile,
        Err(error) => return error.into_response(),
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match upsert_user(&profile, &connection) {
            Ok(user) => user,
            Err(error) => return error.into_response(),
        }
    };

    tracing::info!("User {} signed in", user.id);

    match set_auth_cookie(jar.clone(), user.id, state.cookie_duration) {
        Ok(jar) => (jar, Json(user)).into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (invalidate_auth_cookie(jar), error).into_response()
        }
    }
}

/// Handler for signing out. Always succeeds, even without a session.
pub async fn post_log_out(jar: PrivateCookieJar) -> (StatusCode, PrivateCookieJar) {
    (StatusCode::NO_CONTENT, invalidate_auth_cookie(jar))
}

/// Handler that returns the signed in user.
pub async fn get_current_user(
    State(state): State<LogInState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<User>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection).map(Json)
}
