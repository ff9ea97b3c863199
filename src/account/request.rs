//! The JSON body of account create and update requests.

use serde::Deserialize;

use crate::{
    Error,
    account::{AccountUpdate, NewAccount},
    validation::{ValidationErrors, optional_text, required_integer, required_text},
};

/// An account as sent by the client. Every field is optional so that
/// missing fields can be reported together.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRequest {
    /// The chart of accounts code.
    pub number: Option<i64>,
    /// The name of the account.
    pub name: Option<String>,
    /// A longer description of what the account is for.
    pub description: Option<String>,
    /// The kind of account.
    #[serde(rename = "type")]
    pub account_type: Option<String>,
}

impl AccountRequest {
    /// Validate the request as a new account. `description` may be omitted.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing every invalid field.
    pub fn into_new_account(self) -> Result<NewAccount, Error> {
        let mut errors = ValidationErrors::new();

        let number = required_integer("number", self.number, &mut errors);
        let name = required_text("name", self.name, &mut errors);
        let description = optional_text(self.description);
        let account_type = required_text("type", self.account_type, &mut errors);

        match (number, name, account_type) {
            (Some(number), Some(name), Some(account_type)) if errors.is_empty() => {
                Ok(NewAccount {
                    number,
                    name,
                    description,
                    account_type,
                })
            }
            _ => Err(errors.into()),
        }
    }

    /// Validate the request as changes to an existing account. Omitted
    /// fields are left unchanged, but a name or type that is sent must not
    /// be blank.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing every invalid field.
    pub fn into_update(self) -> Result<AccountUpdate, Error> {
        let mut errors = ValidationErrors::new();

        let name = self
            .name
            .and_then(|name| required_text("name", Some(name), &mut errors));
        let account_type = self
            .account_type
            .and_then(|account_type| required_text("type", Some(account_type), &mut errors));

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(AccountUpdate {
            number: self.number,
            name,
            description: self.description.map(|text| text.trim().to_owned()),
            account_type,
        })
    }
}
