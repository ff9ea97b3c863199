//! Serialize [time::Date] as "YYYY-MM-DD" and parse dates sent by clients.
//!
//! Use with `#[serde(with = "crate::date_format")]`.

use serde::{Deserialize, Deserializer, Serializer};
use time::{
    Date, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

/// Date format for journal entries, e.g. "2025-01-31".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    parse_date(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid date \"{text}\"")))
}

/// Parse a calendar date from either "YYYY-MM-DD" or an RFC 3339 date-time.
///
/// Browser clients commonly send `Date.toISOString()` output, in which case
/// the date in UTC is used.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    Date::parse(text, DATE_FORMAT)
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(text, &Rfc3339)
                .ok()
                .map(|dt| dt.to_offset(UtcOffset::UTC).date())
        })
}
