//! Storage identifiers for accounts and journal entries.
//!
//! An [ObjectId] is 12 bytes rendered as 24 lowercase hexadecimal characters:
//! a 4 byte big-endian unix timestamp, 5 bytes that are random per process,
//! and a 3 byte counter that starts at a random value.

use std::{
    fmt::Display,
    str::FromStr,
    sync::{
        OnceLock,
        atomic::{AtomicU32, Ordering},
    },
};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::OffsetDateTime;

/// The number of characters in the hexadecimal form of an [ObjectId].
pub const OBJECT_ID_HEX_LENGTH: usize = 24;

const COUNTER_MASK: u32 = 0x00ff_ffff;

static PROCESS_UNIQUE: OnceLock<[u8; 5]> = OnceLock::new();
static COUNTER: OnceLock<AtomicU32> = OnceLock::new();

/// The string could not be parsed as an [ObjectId].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("\"{0}\" is not a valid ID, expected 24 hexadecimal characters")]
pub struct InvalidObjectId(pub String);

/// The storage identifier of a document in the application database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Generate a new, unique ID.
    pub fn new() -> Self {
        let timestamp = OffsetDateTime::now_utc().unix_timestamp() as u32;
        let process_unique = PROCESS_UNIQUE.get_or_init(|| rand::random::<[u8; 5]>());
        let counter = COUNTER
            .get_or_init(|| AtomicU32::new(rand::random::<u32>() & COUNTER_MASK))
            .fetch_add(1, Ordering::Relaxed)
            & COUNTER_MASK;

        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&timestamp.to_be_bytes());
        bytes[4..9].copy_from_slice(process_unique);
        bytes[9..].copy_from_slice(&counter.to_be_bytes()[1..]);

        Self(bytes)
    }

    /// The raw bytes of the ID.
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Whether `text` is exactly 24 hexadecimal characters.
    pub fn is_valid(text: &str) -> bool {
        text.len() == OBJECT_ID_HEX_LENGTH && text.bytes().all(|byte| byte.is_ascii_hexdigit())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ObjectId {
    type Err = InvalidObjectId;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if !Self::is_valid(text) {
            return Err(InvalidObjectId(text.to_owned()));
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(text, &mut bytes).map_err(|_| InvalidObjectId(text.to_owned()))?;

        Ok(Self(bytes))
    }
}

impl Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

impl ToSql for ObjectId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ObjectId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rusqlite::Connection;

    use super::{InvalidObjectId, ObjectId};

    #[test]
    fn new_id_is_24_lowercase_hex_characters() {
        let id = ObjectId::new().to_string();

        assert_eq!(id.len(), 24);
        assert!(
            id.chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
            "got {id}"
        );
    }

    #[test]
    fn new_ids_are_unique() {
        let ids: HashSet<ObjectId> = (0..1000).map(|_| ObjectId::new()).collect();

        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn parses_display_output() {
        let id = ObjectId::new();

        let parsed: ObjectId = id.to_string().parse().unwrap();

        assert_eq!(parsed, id);
    }

    #[test]
    fn parses_upper_case_hex() {
        let id: ObjectId = "5F2B6C3A9D1E4F0012AB34CD".parse().unwrap();

        assert_eq!(id.to_string(), "5f2b6c3a9d1e4f0012ab34cd");
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            "abc123".parse::<ObjectId>(),
            Err(InvalidObjectId("abc123".to_owned()))
        );
        assert!("5f2b6c3a9d1e4f0012ab34cd0".parse::<ObjectId>().is_err());
    }

    #[test]
    fn rejects_non_hex_characters() {
        assert!("5f2b6c3a9d1e4f0012ab34cz".parse::<ObjectId>().is_err());
        // Multi-byte characters must not be mistaken for valid input.
        assert!("5f2b6c3a9d1e4f0012ab34é".parse::<ObjectId>().is_err());
    }

    #[test]
    fn deserialize_rejects_invalid_id() {
        let result = serde_json::from_str::<ObjectId>("\"not-an-id\"");

        assert!(result.is_err());
    }

    #[test]
    fn round_trips_through_sqlite() {
        let connection = Connection::open_in_memory().unwrap();
        let id = ObjectId::new();

        let got: ObjectId = connection
            .query_row("SELECT ?1", [id], |row| row.get(0))
            .unwrap();

        assert_eq!(got, id);
    }
}
