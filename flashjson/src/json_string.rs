// SPDX-License-Identifier: Apache-2.0

use core::fmt;

/// Text of a value in a directly addressable buffer, produced by
/// [`JsonValue::to_json_string`](crate::JsonValue::to_json_string).
///
/// 'a is the input buffer and 'b the caller's scratch buffer. Only
/// [`Raw`](JsonString::Raw) text can be kept once the scratch buffer is reused;
/// see [`input_str`](JsonString::input_str).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonString<'a, 'b> {
    /// The trimmed span itself. It held no backslash, so nothing was copied.
    Raw(&'a str),
    /// The span with its escapes decoded into the scratch buffer.
    Decoded(&'b str),
}

impl<'a> JsonString<'a, '_> {
    pub fn as_str(&self) -> &str {
        match self {
            JsonString::Raw(s) => s,
            JsonString::Decoded(s) => s,
        }
    }

    /// The text as a borrow of the input buffer, or `None` if it lives in
    /// scratch.
    pub fn input_str(&self) -> Option<&'a str> {
        match self {
            JsonString::Raw(s) => Some(s),
            JsonString::Decoded(_) => None,
        }
    }

    /// True if escapes were decoded and the scratch buffer holds the text.
    pub fn is_decoded(&self) -> bool {
        matches!(self, JsonString::Decoded(_))
    }
}

impl AsRef<str> for JsonString<'_, '_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Compares the text only, wherever it lives.
impl PartialEq<&str> for JsonString<'_, '_> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for JsonString<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
