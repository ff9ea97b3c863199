//! The public configuration that browser clients need to sign in and call the API.

use axum::{
    Json,
    extract::{FromRef, State},
};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Configuration served to the browser client at start up.
///
/// Built once from the server's command line arguments and stored in
/// [AppState], it contains nothing secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// The browser API key for Google services.
    pub google_api_key: String,
    /// The OAuth client ID that ID tokens must be issued for.
    pub google_client_id: String,
    /// The base URL the client should send API requests to.
    pub api_url: String,
}

impl FromRef<AppState> for ClientConfig {
    fn from_ref(state: &AppState) -> Self {
        state.client_config.clone()
    }
}

/// A route handler that returns the client configuration.
pub async fn get_client_config(State(config): State<ClientConfig>) -> Json<ClientConfig> {
    Json(config)
}
