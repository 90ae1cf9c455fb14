use serde::Serialize;
use std::fmt;
use std::ops::Range;

use crate::error::GuidError;

/// Total width of a GUID.
pub const GUID_LENGTH: usize = 30;

const TIMESTAMP: Range<usize> = 0..17;
const SERVER_ID: Range<usize> = 17..21;
const PROCESS_ID: Range<usize> = 21..26;
const COUNTER: Range<usize> = 26..30;

/// Slices a field by character position. The server id may hold multi-byte
/// characters, so byte offsets shift after it.
fn field(value: &str, chars: Range<usize>) -> &str {
    let byte_at = |n: usize| {
        value
            .char_indices()
            .nth(n)
            .map_or(value.len(), |(offset, _)| offset)
    };
    &value[byte_at(chars.start)..byte_at(chars.end)]
}

/// A 30-character, positionally structured identifier.
///
/// Widths count characters, not bytes. Only the server id can contain
/// non-ASCII characters.
///
/// | field      | width | content                        |
/// |------------|-------|--------------------------------|
/// | timestamp  | 17    | local time, `yyyyMMddHHmmssSSS` |
/// | server id  | 4     | fixed per generator            |
/// | process id | 5     | OS pid modulo 100000           |
/// | counter    | 4     | rolling, wraps at 10000        |
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Guid(String);

impl Guid {
    /// Parses a GUID, checking the layout of every field.
    pub fn parse(value: impl Into<String>) -> Result<Self, GuidError> {
        let value = value.into();
        let length = value.chars().count();
        if length != GUID_LENGTH {
            return Err(GuidError::InvalidLength {
                actual: length,
                expected: GUID_LENGTH,
                guid: value,
            });
        }

        for (name, range) in [
            ("timestamp", TIMESTAMP),
            ("process id", PROCESS_ID),
            ("counter", COUNTER),
        ] {
            if !field(&value, range).bytes().all(|b| b.is_ascii_digit()) {
                return Err(GuidError::Malformed {
                    guid: value,
                    reason: format!("{name} field must be all digits"),
                });
            }
        }

        Ok(Self(value))
    }

    /// Wraps a string the generator has already length-checked.
    pub(crate) fn new_unchecked(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 17-digit `yyyyMMddHHmmssSSS` field.
    pub fn timestamp(&self) -> &str {
        field(&self.0, TIMESTAMP)
    }

    pub fn server_id(&self) -> &str {
        field(&self.0, SERVER_ID)
    }

    pub fn process_id(&self) -> &str {
        field(&self.0, PROCESS_ID)
    }

    /// The rolling counter, in `0..10000`.
    pub fn counter(&self) -> u16 {
        field(&self.0, COUNTER)
            .bytes()
            .fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guid")
            .field("timestamp", &self.timestamp())
            .field("server_id", &self.server_id())
            .field("process_id", &self.process_id())
            .field("counter", &self.counter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_fields() {
        let guid = Guid::parse("20260315090507042SV01123450042").unwrap();

        assert_eq!(guid.timestamp(), "20260315090507042");
        assert_eq!(guid.server_id(), "SV01");
        assert_eq!(guid.process_id(), "12345");
        assert_eq!(guid.counter(), 42);
    }

    #[test]
    fn parse_accepts_padded_server_id() {
        let guid = Guid::parse("20260315090507042AB  000019999").unwrap();
        assert_eq!(guid.server_id(), "AB  ");
        assert_eq!(guid.counter(), 9999);
    }

    #[test]
    fn parse_rejects_wrong_length() {
        let err = Guid::parse("20260315090507042SV0112345004").unwrap_err();
        assert!(matches!(
            err,
            GuidError::InvalidLength {
                actual: 29,
                expected: 30,
                ..
            }
        ));
    }

    #[test]
    fn fields_count_characters_not_bytes() {
        let guid = Guid::parse("20260315090507042서버01123450042").unwrap();

        assert_eq!(guid.timestamp(), "20260315090507042");
        assert_eq!(guid.server_id(), "서버01");
        assert_eq!(guid.process_id(), "12345");
        assert_eq!(guid.counter(), 42);
    }

    #[test]
    fn parse_counts_length_in_characters() {
        // 31 bytes, 29 characters
        let err = Guid::parse("20260315090507042서01123450042").unwrap_err();
        assert!(matches!(err, GuidError::InvalidLength { actual: 29, .. }));
    }

    #[test]
    fn parse_rejects_non_digit_counter() {
        let err = Guid::parse("20260315090507042SV011234500x2").unwrap_err();
        assert!(matches!(err, GuidError::Malformed { .. }));
    }

    #[test]
    fn display_is_raw_and_debug_is_structured() {
        let guid = Guid::parse("20260315090507042SV01123450042").unwrap();
        let debug = format!("{guid:?}");
        assert!(debug.contains("counter: 42"));
        assert_eq!(guid.to_string(), "20260315090507042SV01123450042");
    }
}
