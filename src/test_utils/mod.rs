#![allow(missing_docs)]

use std::sync::Arc;

use async_trait::async_trait;
use axum_extra::extract::cookie::Cookie;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, ClientConfig, Error, IdTokenVerifier, IdentityProfile, auth::COOKIE_TOKEN,
    build_router, endpoints,
};

/// A token that [FakeTokenVerifier] accepts for Ada.
pub(crate) const FAKE_GOOD_TOKEN: &str = "good-token";
/// A token that [FakeTokenVerifier] accepts for Grace.
pub(crate) const FAKE_OTHER_USER_TOKEN: &str = "other-user-token";
/// A token that makes [FakeTokenVerifier] act as if Google cannot be reached.
pub(crate) const FAKE_UNREACHABLE_TOKEN: &str = "unreachable-token";

/// Stands in for Google in tests. Every token except the ones above is rejected.
#[derive(Debug)]
pub(crate) struct FakeTokenVerifier;

#[async_trait]
impl IdTokenVerifier for FakeTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, Error> {
        match id_token {
            FAKE_GOOD_TOKEN => Ok(IdentityProfile {
                subject: "100000000000000000001".to_owned(),
                email: "ada@example.com".to_owned(),
                name: "Ada".to_owned(),
                picture: None,
            }),
            FAKE_OTHER_USER_TOKEN => Ok(IdentityProfile {
                subject: "100000000000000000002".to_owned(),
                email: "grace@example.com".to_owned(),
                name: "Grace".to_owned(),
                picture: Some("https://example.com/grace.png".to_owned()),
            }),
            FAKE_UNREACHABLE_TOKEN => Err(Error::IdentityProvider(
                "connection refused".to_owned(),
            )),
            _ => Err(Error::InvalidIdToken(
                "the identity provider rejected the token".to_owned(),
            )),
        }
    }
}

#[track_caller]
pub(crate) fn get_test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");

    AppState::new(
        connection,
        "42",
        ClientConfig {
            google_api_key: "test-api-key".to_owned(),
            google_client_id: "test-client-id.apps.googleusercontent.com".to_owned(),
            api_url: "http://localhost:3000".to_owned(),
        },
        Arc::new(FakeTokenVerifier),
    )
    .expect("Could not create app state")
}

#[track_caller]
pub(crate) fn get_test_server() -> TestServer {
    TestServer::new(build_router(get_test_app_state())).expect("Could not create test server.")
}

/// Sign in as Ada and return the session cookie.
pub(crate) async fn log_in(server: &TestServer) -> Cookie<'static> {
    let response = server
        .post(endpoints::GOOGLE_LOG_IN)
        .json(&json!({"token": FAKE_GOOD_TOKEN}))
        .await;

    response.assert_status_ok();

    response.cookie(COOKIE_TOKEN)
}
