//! Field-level validation of request bodies.
//!
//! Request bodies are deserialized into structs where every field is
//! optional, then checked field by field so that the client gets every
//! problem with the request in a single response.

use std::fmt::Display;

use serde::Serialize;
use time::Date;

use crate::{Error, date_format::parse_date, object_id::ObjectId};

/// A problem with a single field of a request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// The path to the field, e.g. "lines[0].debit".
    pub field: String,
    /// What is wrong with the field.
    pub message: String,
}

/// The collected field errors for a request body.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// An empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` is invalid.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Whether no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The recorded errors in the order they were found.
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self
            .0
            .iter()
            .map(|error| format!("{} {}", error.field, error.message))
            .collect();

        f.write_str(&messages.join("; "))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// A required, non-blank text field. Returns the trimmed text.
pub fn required_text(
    field: &str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        None => {
            errors.add(field, "is required");
            None
        }
        Some("") => {
            errors.add(field, "must not be empty");
            None
        }
        Some(text) => Some(text.to_owned()),
    }
}

/// Trim `value` if set, otherwise an empty string.
pub fn optional_text(value: Option<String>) -> String {
    value.map(|text| text.trim().to_owned()).unwrap_or_default()
}

/// A required calendar date, see [parse_date] for the accepted formats.
pub fn required_date(
    field: &str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<Date> {
    let Some(text) = value else {
        errors.add(field, "is required");
        return None;
    };

    let date = parse_date(&text);

    if date.is_none() {
        errors.add(field, "must be a valid date, e.g. \"2025-01-31\"");
    }

    date
}

/// A required integer field.
pub fn required_integer(
    field: &str,
    value: Option<i64>,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    if value.is_none() {
        errors.add(field, "is required");
    }

    value
}

/// A monetary amount that defaults to zero and must be a finite, non-negative number.
pub fn amount(field: &str, value: Option<f64>, errors: &mut ValidationErrors) -> f64 {
    let amount = value.unwrap_or(0.0);

    if !amount.is_finite() {
        errors.add(field, "must be a number");
    } else if amount < 0.0 {
        errors.add(field, "must not be negative");
    }

    amount
}

/// An optional reference to another document. Blank strings are treated as unset.
pub fn optional_object_id(
    field: &str,
    value: Option<String>,
    errors: &mut ValidationErrors,
) -> Option<ObjectId> {
    let text = value?;
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    match text.parse() {
        Ok(id) => Some(id),
        Err(error) => {
            errors.add(field, error.to_string());
            None
        }
    }
}
