//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/journal/{entry_id}', use [format_endpoint].

use std::fmt::Display;

/// The route for listing and creating journal entries.
pub const JOURNAL: &str = "/journal";
/// The route to access a single journal entry by its storage ID.
pub const JOURNAL_ENTRY: &str = "/journal/{entry_id}";
/// The route for listing and creating accounts.
pub const ACCOUNTS: &str = "/accounts";
/// The route to access a single account by its storage ID.
pub const ACCOUNT: &str = "/accounts/{account_id}";
/// The route for signing in with a Google ID token.
pub const GOOGLE_LOG_IN: &str = "/auth/google";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/auth/logout";
/// The route to get the signed in user.
pub const CURRENT_USER: &str = "/auth/me";
/// The route for the public client configuration.
pub const CLIENT_CONFIG: &str = "/api/config";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/accounts/{account_id}', '{account_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::{ObjectId, endpoints};

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::JOURNAL);
        assert_endpoint_is_valid_uri(endpoints::JOURNAL_ENTRY);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNTS);
        assert_endpoint_is_valid_uri(endpoints::ACCOUNT);
        assert_endpoint_is_valid_uri(endpoints::GOOGLE_LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::CURRENT_USER);
        assert_endpoint_is_valid_uri(endpoints::CLIENT_CONFIG);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn formats_object_id() {
        let id: ObjectId = "5f2b6c3a9d1e4f0012ab34cd".parse().unwrap();

        let formatted_path = format_endpoint(endpoints::JOURNAL_ENTRY, id);

        assert_eq!(formatted_path, "/journal/5f2b6c3a9d1e4f0012ab34cd");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
