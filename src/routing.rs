//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, Error,
    account::{
        create_account_endpoint, delete_account_endpoint, edit_account_endpoint,
        get_account_endpoint, get_accounts_endpoint,
    },
    auth::{auth_guard, get_current_user, post_google_log_in, post_log_out},
    config::get_client_config,
    endpoints,
    journal::{
        create_journal_entry_endpoint, delete_journal_entry_endpoint, edit_journal_entry_endpoint,
        get_journal_entries_endpoint, get_journal_entry_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Requests that match no route are served from the static directory, and
/// get a 404 JSON error if there is no such file.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::GOOGLE_LOG_IN, post(post_google_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::CLIENT_CONFIG, get(get_client_config));

    let protected_routes = Router::new()
        .route(
            endpoints::JOURNAL,
            get(get_journal_entries_endpoint).post(create_journal_entry_endpoint),
        )
        .route(
            endpoints::JOURNAL_ENTRY,
            get(get_journal_entry_endpoint)
                .put(edit_journal_entry_endpoint)
                .delete(delete_journal_entry_endpoint),
        )
        .route(
            endpoints::ACCOUNTS,
            get(get_accounts_endpoint).post(create_account_endpoint),
        )
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(edit_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(endpoints::CURRENT_USER, get(get_current_user))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    let static_files =
        ServeDir::new(&state.static_dir).not_found_service(get_404_not_found.into_service());

    protected_routes
        .merge(unprotected_routes)
        .fallback_service(static_files)
        .with_state(state)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
