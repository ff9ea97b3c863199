//! The journal: entries with sequential transaction IDs, their storage and
//! the JSON endpoints for managing them.

mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod model;
mod request;
mod trans_id;

pub use create_endpoint::create_journal_entry_endpoint;
pub use delete_endpoint::delete_journal_entry_endpoint;
pub use edit_endpoint::edit_journal_entry_endpoint;
pub use get_endpoint::{get_journal_entries_endpoint, get_journal_entry_endpoint};
pub use model::{
    Attachment, JournalEntry, JournalEntryUpdate, JournalLine, NewJournalEntry,
    create_journal_entry, create_journal_entry_table, delete_journal_entry, get_journal_entries,
    get_journal_entry, insert_journal_entry, update_journal_entry,
};
pub use trans_id::{TransId, allocate_next_trans_id};
