// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur when turning a span into text.
///
/// Navigation itself never fails: a missing property or a shape mismatch is an
/// invalid [`JsonValue`](crate::JsonValue), not an error.
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The provided scratch buffer was not large enough for the decoded string.
    ScratchBufferFull,
    /// A string slice was not valid UTF-8.
    InvalidUtf8(core::str::Utf8Error),
}

impl From<core::str::Utf8Error> for ParseError {
    fn from(err: core::str::Utf8Error) -> Self {
        ParseError::InvalidUtf8(err)
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::ScratchBufferFull => f.write_str("scratch buffer too small"),
            ParseError::InvalidUtf8(e) => write!(f, "Invalid UTF-8: {e}"),
        }
    }
}

pub(crate) const fn from_utf8(v: &[u8]) -> Result<&str, ParseError> {
    match core::str::from_utf8(v) {
        Ok(s) => Ok(s),
        Err(e) => Err(ParseError::InvalidUtf8(e)),
    }
}
