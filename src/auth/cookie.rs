//! Defines functions for handling user sessions with private cookies.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::UserID, auth::token::Token};

/// The name of the cookie holding the session [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to the cookie jar, indicating that a user is signed in.
///
/// The session ends `duration` from now unless it is extended.
///
/// # Errors
///
/// Returns an [Error::JSONSerializationError] if the token could not be serialized.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot extend session by {duration}")))?;

    set_token_cookie(
        jar,
        &Token {
            user_id,
            expires_at,
        },
    )
}

fn set_token_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .path("/")
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .path("/")
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session token from the cookie jar.
///
/// # Errors
///
/// Returns [Error::NotAuthenticated] if the cookie is missing, could not be
/// decrypted, does not contain a token or the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::NotAuthenticated)?;

    let token: Token = serde_json::from_str(cookie.value_trimmed()).map_err(|error| {
        tracing::debug!("Could not parse session token: {error}");
        Error::NotAuthenticated
    })?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::NotAuthenticated);
    }

    Ok(token)
}

/// Set the expiry of the auth cookie in `jar` to the latest of UTC now
/// plus `duration` and the token's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::NotAuthenticated] if there is no valid session token in the jar.
/// - [Error::CookieError] if extending the session by `duration` would overflow the date time.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::CookieError(format!("cannot extend session by {duration}")))?;

    if new_expiry <= token.expires_at {
        return Ok(jar);
    }

    set_token_cookie(
        jar,
        &Token {
            user_id: token.user_id,
            expires_at: new_expiry,
        },
    )
}
