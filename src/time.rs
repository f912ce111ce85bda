//! Timestamp decoding for TGit payloads.
//!
//! TGit reports some timestamps with a `+0000` suffix although the values
//! are in China Standard Time. Those suffixes are rewritten to the remote
//! offset before RFC 3339 parsing.

use chrono::{DateTime, FixedOffset, ParseResult};

/// Offset of timestamps reported with a `+0000` suffix, in seconds east of UTC.
pub const REMOTE_OFFSET_SECS: i32 = 8 * 3600;

/// The offset TGit means when it writes `+0000`.
pub fn remote_offset() -> FixedOffset {
    FixedOffset::east_opt(REMOTE_OFFSET_SECS).expect("+08:00 is within the valid offset range")
}

/// Parse a TGit timestamp, treating `+0000` as [`remote_offset`].
pub fn parse_time(s: &str) -> ParseResult<DateTime<FixedOffset>> {
    parse_time_with_offset(s, remote_offset())
}

/// Parse a timestamp, substituting `offset` for a literal `+0000`.
pub fn parse_time_with_offset(s: &str, offset: FixedOffset) -> ParseResult<DateTime<FixedOffset>> {
    let normalized = s.replace("+0000", &offset.to_string());
    DateTime::parse_from_rfc3339(&normalized)
}

/// Serde adapter for `Option<DateTime<FixedOffset>>` fields.
///
/// Use with `#[serde(default, with = "crate::time::option")]`.
pub mod option {
    use chrono::{DateTime, FixedOffset};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_some(&t.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => super::parse_time(&s).map(Some).map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}
