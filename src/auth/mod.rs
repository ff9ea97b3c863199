//! Signing in with Google and tracking the session with a private cookie.

mod cookie;
mod google;
mod log_in;
mod middleware;
mod token;
mod user;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use google::{GoogleTokenVerifier, IdTokenVerifier, IdentityProfile};
pub use log_in::{get_current_user, post_google_log_in, post_log_out};
pub use middleware::{AuthState, auth_guard};
pub use user::{User, UserID, create_user_table, get_user_by_id, upsert_user};

#[cfg(test)]
pub(crate) use cookie::COOKIE_TOKEN;
