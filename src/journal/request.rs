//! The JSON body of journal entry create and update requests.

use serde::Deserialize;

use crate::{
    Error,
    journal::{Attachment, JournalEntryUpdate, JournalLine, NewJournalEntry},
    validation::{
        ValidationErrors, amount, optional_object_id, optional_text, required_date,
        required_integer, required_text,
    },
};

/// A journal line as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalLineRequest {
    /// The number of the account in the chart of accounts.
    pub account_number: Option<i64>,
    /// The name of the account.
    pub account_name: Option<String>,
    /// The storage ID of the account.
    pub account: Option<String>,
    /// The amount debited, zero if omitted.
    pub debit: Option<f64>,
    /// The amount credited, zero if omitted.
    pub credit: Option<f64>,
}

/// An attachment as sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentRequest {
    /// The file name.
    pub name: Option<String>,
    /// Where the file can be downloaded from.
    pub url: Option<String>,
    /// A free text tag.
    pub category: Option<String>,
    /// The MIME type of the file.
    pub mime_type: Option<String>,
}

/// A journal entry as sent by the client.
///
/// Any `trans_id` in the body is ignored, transaction IDs are assigned by
/// the server and never change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalEntryRequest {
    /// When the transaction happened, "YYYY-MM-DD" or an RFC 3339 date-time.
    pub date: Option<String>,
    /// What the transaction was for.
    pub description: Option<String>,
    /// Supporting documents.
    pub attachments: Option<Vec<AttachmentRequest>>,
    /// The debits and credits.
    pub lines: Option<Vec<JournalLineRequest>>,
}

fn validate_lines(
    lines: Option<Vec<JournalLineRequest>>,
    errors: &mut ValidationErrors,
) -> Vec<JournalLine> {
    let Some(lines) = lines else {
        errors.add("lines", "is required");
        return Vec::new();
    };

    if lines.is_empty() {
        errors.add("lines", "must have at least one line");
    }

    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, line)| {
            let field = |name: &str| format!("lines[{i}].{name}");

            let account_number =
                required_integer(&field("account_number"), line.account_number, errors);
            let account_name = optional_text(line.account_name);
            let account = optional_object_id(&field("account"), line.account, errors);
            let debit = amount(&field("debit"), line.debit, errors);
            let credit = amount(&field("credit"), line.credit, errors);

            Some(JournalLine {
                account_number: account_number?,
                account_name,
                account,
                debit,
                credit,
            })
        })
        .collect()
}

fn validate_attachments(
    attachments: Vec<AttachmentRequest>,
    errors: &mut ValidationErrors,
) -> Vec<Attachment> {
    attachments
        .into_iter()
        .enumerate()
        .filter_map(|(i, attachment)| {
            let name = required_text(&format!("attachments[{i}].name"), attachment.name, errors);
            let url = required_text(&format!("attachments[{i}].url"), attachment.url, errors);

            Some(Attachment {
                name: name?,
                url: url?,
                category: optional_text(attachment.category),
                mime_type: optional_text(attachment.mime_type),
            })
        })
        .collect()
}

impl JournalEntryRequest {
    /// Validate the request as a new journal entry.
    ///
    /// The date, description and at least one line are required.
    /// Attachments may be omitted.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing every invalid field.
    pub fn into_new_entry(self) -> Result<NewJournalEntry, Error> {
        let mut errors = ValidationErrors::new();

        let date = required_date("date", self.date, &mut errors);
        let description = required_text("description", self.description, &mut errors);
        let lines = validate_lines(self.lines, &mut errors);
        let attachments = validate_attachments(self.attachments.unwrap_or_default(), &mut errors);

        match (date, description) {
            (Some(date), Some(description)) if errors.is_empty() => Ok(NewJournalEntry {
                date,
                description,
                attachments,
                lines,
            }),
            _ => Err(errors.into()),
        }
    }

    /// Validate the request as changes to an existing journal entry.
    ///
    /// Omitted fields are left unchanged. Fields that are sent are checked
    /// the same way as for a new entry.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] listing every invalid field.
    pub fn into_update(self) -> Result<JournalEntryUpdate, Error> {
        let mut errors = ValidationErrors::new();

        let date = self
            .date
            .and_then(|date| required_date("date", Some(date), &mut errors));
        let description = self
            .description
            .and_then(|description| required_text("description", Some(description), &mut errors));
        let lines = self
            .lines
            .map(|lines| validate_lines(Some(lines), &mut errors));
        let attachments = self
            .attachments
            .map(|attachments| validate_attachments(attachments, &mut errors));

        if !errors.is_empty() {
            return Err(errors.into());
        }

        Ok(JournalEntryUpdate {
            date,
            description,
            attachments,
            lines,
        })
    }
}
