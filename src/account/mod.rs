//! The chart of accounts: storage and the JSON endpoints for managing it.

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod model;
mod request;

pub use create_endpoint::create_account_endpoint;
pub use delete_endpoint::delete_account_endpoint;
pub use edit_endpoint::edit_account_endpoint;
pub use get_endpoint::{get_account_endpoint, get_accounts_endpoint};
pub use model::{
    Account, AccountUpdate, NewAccount, create_account, create_account_table, delete_account,
    get_account, get_accounts, update_account,
};
