//! Implements a struct that holds the state of the REST server.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::{DEFAULT_COOKIE_DURATION, IdTokenVerifier},
    config::ClientConfig,
    db::initialize,
};

/// The directory static files are served from unless configured otherwise.
pub const DEFAULT_STATIC_DIR: &str = "static/";

/// The state of the REST server.
///
/// Everything in here is loaded once at startup and handed to the route
/// handlers through [FromRef] sub-states.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// The configuration served to browser clients.
    pub client_config: ClientConfig,

    /// Verifies the ID tokens that clients sign in with.
    pub token_verifier: Arc<dyn IdTokenVerifier>,

    /// The directory that static files are served from.
    pub static_dir: PathBuf,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        client_config: ClientConfig,
        token_verifier: Arc<dyn IdTokenVerifier>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            client_config,
            token_verifier,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Serve static files from `static_dir` instead of [DEFAULT_STATIC_DIR].
    pub fn with_static_dir(mut self, static_dir: impl Into<PathBuf>) -> Self {
        self.static_dir = static_dir.into();
        self
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
