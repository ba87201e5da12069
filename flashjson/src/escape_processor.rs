// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use core::ops::Range;

use crate::parse_error::{from_utf8, ParseError};
use crate::CharSource;

/// Backslash-escape decoder, fed one byte at a time.
///
/// Recognized escapes are `\b`, `\f`, `\n`, `\r`, `\\` and `\t`. Any other
/// escaped character is dropped along with its backslash; that includes
/// `\"`, `\/` and the `u` of a `\uXXXX` sequence, whose hex digits then come
/// through as plain text.
#[derive(Debug, Default)]
pub(crate) struct EscapeProcessor {
    /// A backslash was seen and not yet consumed by an escape
    escaping: bool,
}

impl EscapeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one input byte, returning the byte to emit, if any.
    pub fn process_byte(&mut self, c: u8) -> Option<u8> {
        if self.escaping {
            self.escaping = false;
            return Self::process_simple_escape(c);
        }
        if c == b'\\' {
            self.escaping = true;
            return None;
        }
        Some(c)
    }

    /// Maps the character following a backslash to the decoded byte.
    ///
    /// `\f` decodes to `0x0F`, not the form feed `0x0C`; existing data written
    /// against this decoder depends on that value.
    pub fn process_simple_escape(escape_char: u8) -> Option<u8> {
        match escape_char {
            b'b' => Some(0x08),
            b'f' => Some(0x0F),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b'\\' => Some(b'\\'),
            b't' => Some(b'\t'),
            _ => None,
        }
    }
}

/// Decodes the escapes in `span` into a new vector.
pub(crate) fn unescape_to_vec<S: CharSource + ?Sized>(source: &S, span: Range<usize>) -> Vec<u8> {
    let mut processor = EscapeProcessor::new();
    let mut out = Vec::with_capacity(span.len());
    out.extend(span.filter_map(|pos| processor.process_byte(source.read_byte(pos))));
    out
}

/// Decodes the escapes in `span` into `scratch`, without allocating.
///
/// Fails with [`ParseError::ScratchBufferFull`] if the decoded text does not
/// fit, or [`ParseError::InvalidUtf8`] if it is not UTF-8.
pub(crate) fn unescape_into<'b, S: CharSource + ?Sized>(
    source: &S,
    span: Range<usize>,
    scratch: &'b mut [u8],
) -> Result<&'b str, ParseError> {
    let mut processor = EscapeProcessor::new();
    let mut written = 0usize;
    for pos in span {
        if let Some(byte) = processor.process_byte(source.read_byte(pos)) {
            let slot = scratch
                .get_mut(written)
                .ok_or(ParseError::ScratchBufferFull)?;
            *slot = byte;
            written += 1;
        }
    }
    let decoded = scratch.get(..written).unwrap_or(&[]);
    from_utf8(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: &[u8]) -> Vec<u8> {
        unescape_to_vec(raw, 0..raw.len())
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(decode(b"hello world"), b"hello world");
        assert_eq!(decode(b""), b"");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(decode(br"line1\nline2\t!"), b"line1\nline2\t!");
        assert_eq!(decode(br"a\rb\bc"), b"a\rb\x08c");
        assert_eq!(decode(br"back\\slash"), b"back\\slash");
    }

    #[test]
    fn test_form_feed_decodes_to_0x0f() {
        assert_eq!(decode(br"\f"), b"\x0f");
    }

    #[test]
    fn test_unknown_escapes_are_dropped() {
        assert_eq!(decode(br#"say \"hi\""#), b"say hi");
        assert_eq!(decode(br"a\/b"), b"ab");
        assert_eq!(decode(br"\u0041"), b"0041");
        assert_eq!(decode(br"\q"), b"");
    }

    #[test]
    fn test_escaped_backslash_is_consumed() {
        // `\\` then a plain `n`, not `\` followed by a newline
        assert_eq!(decode(br"\\n"), b"\\n");
        assert_eq!(decode(br"\\\\"), b"\\\\");
        assert_eq!(decode(br"\\\n"), b"\\\n");
    }

    #[test]
    fn test_trailing_backslash_is_dropped() {
        assert_eq!(decode(br"abc\"), b"abc");
    }

    #[test]
    fn test_span_is_respected() {
        let raw: &[u8] = br#"xx"a\tb"yy"#;
        assert_eq!(unescape_to_vec(raw, 3..7), b"a\tb");
    }

    #[test]
    fn test_unescape_into_scratch() {
        let raw: &[u8] = br"tab\there";
        let mut scratch = [0u8; 16];
        assert_eq!(unescape_into(raw, 0..raw.len(), &mut scratch), Ok("tab\there"));
    }

    #[test]
    fn test_unescape_into_exact_fit() {
        let raw: &[u8] = br"a\nb";
        let mut scratch = [0u8; 3];
        assert_eq!(unescape_into(raw, 0..raw.len(), &mut scratch), Ok("a\nb"));
    }

    #[test]
    fn test_unescape_into_scratch_too_small() {
        let raw: &[u8] = br"a\nbc";
        let mut scratch = [0u8; 3];
        assert_eq!(
            unescape_into(raw, 0..raw.len(), &mut scratch),
            Err(ParseError::ScratchBufferFull)
        );
    }

    #[test]
    fn test_unescape_into_invalid_utf8() {
        let raw: &[u8] = &[b'a', 0xFF];
        let mut scratch = [0u8; 4];
        assert!(matches!(
            unescape_into(raw, 0..raw.len(), &mut scratch),
            Err(ParseError::InvalidUtf8(_))
        ));
    }
}
