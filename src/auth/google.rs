//! Verification of Google ID tokens.
//!
//! The browser client signs the user in with Google and sends the resulting
//! ID token to the server. The token is checked with Google's `tokeninfo`
//! endpoint, which validates the signature and expiry, and the claims are
//! then checked against this application's OAuth client ID.

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// The endpoint that validates Google ID tokens.
pub const GOOGLE_TOKEN_INFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

/// The identity of a user vouched for by the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityProfile {
    /// The identity provider's stable identifier for the user.
    pub subject: String,
    /// The user's email address.
    pub email: String,
    /// The user's display name.
    pub name: String,
    /// A URL to the user's profile picture.
    pub picture: Option<String>,
}

/// Turns an ID token from a client into the identity of the user it was issued to.
#[async_trait]
pub trait IdTokenVerifier: Debug + Send + Sync {
    /// Verify `id_token` and return the profile of the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidIdToken] if the token is invalid, expired or
    /// issued for another client, and [Error::IdentityProvider] if the token
    /// could not be checked.
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, Error>;
}

/// Verifies ID tokens with Google's `tokeninfo` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    client_id: String,
    token_info_url: String,
}

impl GoogleTokenVerifier {
    /// Create a verifier that accepts tokens issued for `client_id`.
    pub fn new(client_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.to_owned(),
            token_info_url: GOOGLE_TOKEN_INFO_URL.to_owned(),
        }
    }

    /// Check tokens against `token_info_url` instead of [GOOGLE_TOKEN_INFO_URL].
    pub fn with_token_info_url(mut self, token_info_url: &str) -> Self {
        self.token_info_url = token_info_url.to_owned();
        self
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, id_token: &str) -> Result<IdentityProfile, Error> {
        let response = self
            .client
            .get(&self.token_info_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|error| Error::IdentityProvider(error.to_string()))?;

        let status = response.status();

        if status.is_client_error() {
            tracing::debug!("Identity provider rejected ID token with status {status}");
            return Err(Error::InvalidIdToken(
                "the identity provider rejected the token".to_owned(),
            ));
        }

        if !status.is_success() {
            return Err(Error::IdentityProvider(format!(
                "unexpected response status {status}"
            )));
        }

        let token_info: TokenInfo = response
            .json()
            .await
            .map_err(|error| Error::IdentityProvider(error.to_string()))?;

        check_token_info(token_info, &self.client_id, OffsetDateTime::now_utc())
    }
}

/// The claims returned by the `tokeninfo` endpoint. Numbers are sent as strings.
#[derive(Debug, Clone, Deserialize)]
struct TokenInfo {
    iss: String,
    aud: String,
    sub: String,
    exp: String,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

fn check_token_info(
    token_info: TokenInfo,
    client_id: &str,
    now: OffsetDateTime,
) -> Result<IdentityProfile, Error> {
    if token_info.aud != client_id {
        return Err(Error::InvalidIdToken(
            "the token was issued for another client".to_owned(),
        ));
    }

    if !GOOGLE_ISSUERS.contains(&token_info.iss.as_str()) {
        return Err(Error::InvalidIdToken(format!(
            "unexpected issuer \"{}\"",
            token_info.iss
        )));
    }

    let expires_at: i64 = token_info
        .exp
        .parse()
        .map_err(|_| Error::InvalidIdToken(format!("invalid expiry \"{}\"", token_info.exp)))?;

    if expires_at <= now.unix_timestamp() {
        return Err(Error::InvalidIdToken("the token has expired".to_owned()));
    }

    let email = token_info.email.unwrap_or_default();
    let name = token_info.name.unwrap_or_else(|| email.clone());

    Ok(IdentityProfile {
        subject: token_info.sub,
        email,
        name,
        picture: token_info.picture,
    })
}
