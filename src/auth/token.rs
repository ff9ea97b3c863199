//! The session token kept inside the private `token` cookie.
//!
//! The cookie jar encrypts and signs the token, so it only has to carry who
//! signed in and until when. The expiry is stored as a unix timestamp.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::UserID;

/// The session of a signed in user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Token {
    /// The signed in user.
    pub user_id: UserID,

    /// When the session ends unless the auth guard extends it.
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Whether the session has ended at `now`.
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{UserID, auth::token::Token};

    #[test]
    fn stores_expiry_as_unix_timestamp() {
        let token = Token {
            user_id: UserID::new(7),
            expires_at: datetime!(2025-12-21 03:54:00 UTC),
        };

        let json = serde_json::to_string(&token).unwrap();

        assert_eq!(json, r#"{"user_id":7,"expires_at":1766289240}"#);
        assert_eq!(serde_json::from_str::<Token>(&json).unwrap(), token);
    }

    #[test]
    fn rejects_session_without_expiry() {
        let result = serde_json::from_str::<Token>(r#"{"user_id":7}"#);

        assert!(result.is_err());
    }

    #[test]
    fn session_ends_at_expiry_time() {
        let expires_at = OffsetDateTime::UNIX_EPOCH + Duration::days(20_000);
        let token = Token {
            user_id: UserID::new(1),
            expires_at,
        };

        assert!(!token.is_expired(expires_at - Duration::seconds(1)));
        assert!(token.is_expired(expires_at));
        assert!(token.is_expired(expires_at + Duration::minutes(5)));
    }
}
