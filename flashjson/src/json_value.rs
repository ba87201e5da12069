// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::marker::PhantomData;
use core::ops::Range;

use crate::container_iter::{ArrayItems, ObjectEntries, ObjectMembers};
use crate::escape_processor::{unescape_into, unescape_to_vec};
use crate::parse_error::{from_utf8, ParseError};
use crate::skip_scanner::is_json_whitespace;
use crate::{CharSource, DefaultConfig, JsonString, PagedSource, ScanConfig, DEFAULT_WINDOW};

/// A value read from a directly addressable buffer.
pub type DirectValue<'a, C = DefaultConfig> = JsonValue<'a, [u8], C>;

/// A value read through a [`PagedSource`].
pub type PagedValue<'a, B, const N: usize = DEFAULT_WINDOW> = JsonValue<'a, PagedSource<B, N>>;

/// Offset and length of a trimmed value inside its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len)
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }
}

/// Strips JSON whitespace from both ends of `offset..offset + len`, then one
/// pair of surrounding double quotes. Returns the span and whether quotes were
/// stripped.
fn trim<S: CharSource + ?Sized>(source: &S, offset: usize, len: usize) -> (Span, bool) {
    let mut start = offset.min(source.len());
    let mut end = offset.saturating_add(len).min(source.len());

    while start < end && is_json_whitespace(source.read_byte(start)) {
        start += 1;
    }
    while end > start && is_json_whitespace(source.read_byte(end - 1)) {
        end -= 1;
    }

    let quoted = end - start >= 2
        && source.read_byte(start) == b'"'
        && source.read_byte(end - 1) == b'"';
    if quoted {
        start += 1;
        end -= 1;
    }

    (
        Span {
            start,
            len: end - start,
        },
        quoted,
    )
}

/// A trimmed, zero-copy view of one JSON value inside a [`CharSource`].
///
/// The view is just a span: nothing is parsed up front. Classification looks at
/// the first byte, and lookups and iteration scan the span on demand, producing
/// further views into the same buffer.
///
/// A view can be *invalid*, meaning "no value": that is what a failed lookup
/// returns. Every query on an invalid view yields an empty result.
///
/// Lifetime 'a is the borrow of the source; a view never outlives its buffer.
pub struct JsonValue<'a, S: ?Sized, C = DefaultConfig> {
    source: &'a S,
    span: Option<Span>,
    /// A layer of surrounding quotes was stripped from the span
    quoted: bool,
    _config: PhantomData<C>,
}

/// Constructors using the default scan configuration
impl<'a, S: CharSource + ?Sized> JsonValue<'a, S, DefaultConfig> {
    /// Creates a view over the whole source, up to the first NUL byte.
    ///
    /// # Example
    /// ```
    /// use flashjson::JsonValue;
    /// let root = JsonValue::new(&b"  {\"ok\": true}  "[..]);
    /// assert!(root.is_object());
    /// ```
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source)
    }

    /// Creates a view over the NUL-terminated text starting at `offset`.
    pub fn at(source: &'a S, offset: usize) -> Self {
        Self::with_config_at(source, offset)
    }

    /// Creates a view over `len` bytes starting at `offset`.
    ///
    /// The span is clamped to the end of the source.
    pub fn from_span(source: &'a S, offset: usize, len: usize) -> Self {
        Self::with_config_span(source, offset, len)
    }
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> JsonValue<'a, S, C> {
    /// Creates a view over the whole source with a custom [`ScanConfig`].
    pub fn with_config(source: &'a S) -> Self {
        Self::with_config_at(source, 0)
    }

    /// Creates a view over the NUL-terminated text at `offset` with a custom [`ScanConfig`].
    pub fn with_config_at(source: &'a S, offset: usize) -> Self {
        let len = source.c_str_len(offset);
        Self::with_config_span(source, offset, len)
    }

    /// Creates a view over `len` bytes at `offset` with a custom [`ScanConfig`].
    /// This is the core constructor that all other constructors delegate to.
    pub fn with_config_span(source: &'a S, offset: usize, len: usize) -> Self {
        let (span, quoted) = trim(source, offset, len);
        Self::from_raw_parts(source, span, quoted)
    }

    /// The "no value" view.
    pub fn invalid(source: &'a S) -> Self {
        Self {
            source,
            span: None,
            quoted: false,
            _config: PhantomData,
        }
    }

    /// Wraps an already trimmed span.
    pub(crate) fn from_raw_parts(source: &'a S, span: Span, quoted: bool) -> Self {
        Self {
            source,
            span: Some(span),
            quoted,
            _config: PhantomData,
        }
    }

    /// The source this view reads from.
    pub fn source(&self) -> &'a S {
        self.source
    }

    /// True unless this is the "no value" view. Says nothing about whether the
    /// content is well-formed.
    pub fn is_valid(&self) -> bool {
        self.span.is_some()
    }

    /// Converts the "no value" view into `None`.
    ///
    /// ```
    /// # use flashjson::JsonValue;
    /// let json = br#"{"a": {"b": 1}}"#;
    /// let root = JsonValue::new(&json[..]);
    /// let b = root.get_property("a").into_option().map(|a| a.get_property("b"));
    /// assert_eq!(b.map(|b| b.as_bytes()), Some(&b"1"[..]));
    /// ```
    pub fn into_option(self) -> Option<Self> {
        self.is_valid().then_some(self)
    }

    fn first_byte(&self) -> Option<u8> {
        self.span
            .filter(|span| span.len > 0)
            .map(|span| self.source.read_byte(span.start))
    }

    /// True if the value starts with `{`.
    pub fn is_object(&self) -> bool {
        self.first_byte() == Some(b'{')
    }

    /// True if the value starts with `[`.
    pub fn is_array(&self) -> bool {
        self.first_byte() == Some(b'[')
    }

    /// True if a pair of surrounding quotes was stripped, i.e. the value was
    /// written as a JSON string.
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Length of the trimmed span in bytes; zero for the invalid view.
    pub fn len(&self) -> usize {
        self.span.map_or(0, |span| span.len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the trimmed value inside its source, for pass-through use.
    pub fn raw_span(&self) -> Option<Range<usize>> {
        self.span.map(|span| span.range())
    }

    /// Copies the trimmed value out of the source, without decoding escapes.
    pub fn raw_bytes(&self) -> Vec<u8> {
        self.span
            .map(|span| self.source.read_bytes(span.start, span.len))
            .unwrap_or_default()
    }

    /// Re-applies trimming to this view's own span.
    ///
    /// Stable: trimming a view again changes nothing. A quoted view is returned
    /// as is, since its one layer of delimiters is already gone and its
    /// content may legitimately start or end with whitespace.
    pub fn trimmed(&self) -> Self {
        match self.span {
            Some(span) if !self.quoted => Self::with_config_span(self.source, span.start, span.len),
            _ => *self,
        }
    }

    /// Decodes backslash escapes over the whole span into owned bytes.
    ///
    /// Decoding applies to any value, not just strings; only call it on values
    /// known to be strings.
    pub fn materialize_bytes(&self) -> Vec<u8> {
        self.raw_span()
            .map(|range| unescape_to_vec(self.source, range))
            .unwrap_or_default()
    }

    /// Decodes backslash escapes over the whole span into an owned string.
    ///
    /// # Example
    /// ```
    /// # use flashjson::JsonValue;
    /// let json = br#"{"msg": "one\ttwo"}"#;
    /// let root = JsonValue::new(&json[..]);
    /// assert_eq!(root.get_property("msg").materialize().unwrap(), "one\ttwo");
    /// ```
    pub fn materialize(&self) -> Result<String, ParseError> {
        String::from_utf8(self.materialize_bytes())
            .map_err(|e| ParseError::InvalidUtf8(e.utf8_error()))
    }

    /// Decodes backslash escapes into `scratch`, without allocating.
    pub fn unescape_into<'b>(&self, scratch: &'b mut [u8]) -> Result<&'b str, ParseError> {
        let range = self.raw_span().unwrap_or(0..0);
        unescape_into(self.source, range, scratch)
    }

    fn body(&self) -> Option<Range<usize>> {
        // Skip the opening `{` or `[`
        self.span
            .map(|span| span.start.saturating_add(1)..span.end())
    }

    /// Lazily iterates the elements of an array.
    ///
    /// Yields nothing if this is not an array. Call again to start over.
    pub fn items(&self) -> ArrayItems<'a, S, C> {
        ArrayItems::new(self.source, self.body().filter(|_| self.is_array()))
    }

    /// Lazily iterates the members of an object as `(name, value)` views.
    ///
    /// The name view has its quotes stripped; nothing is allocated.
    pub fn entries(&self) -> ObjectEntries<'a, S, C> {
        ObjectEntries::new(self.source, self.body().filter(|_| self.is_object()))
    }

    /// Lazily iterates the members of an object with owned names.
    pub fn members(&self) -> ObjectMembers<'a, S, C> {
        ObjectMembers::new(self.entries())
    }

    /// Calls `f` with each array element. Does nothing if this is not an array.
    pub fn for_each_array_item<F>(&self, f: F)
    where
        F: FnMut(Self),
    {
        self.items().for_each(f);
    }

    /// Calls `f` with each object member's name and value. Does nothing if this
    /// is not an object.
    pub fn for_each_object_item<F>(&self, mut f: F)
    where
        F: FnMut(String, Self),
    {
        self.members().for_each(|(name, value)| f(name, value));
    }
}

/// Zero-copy access for directly addressable memory
impl<'a, C: ScanConfig> JsonValue<'a, [u8], C> {
    /// The trimmed value as a slice of the original buffer; empty if invalid.
    pub fn as_bytes(&self) -> &'a [u8] {
        let source: &'a [u8] = self.source;
        self.raw_span()
            .and_then(|range| source.get(range))
            .unwrap_or(&[])
    }

    /// The trimmed value as a `&str` of the original buffer, escapes untouched.
    pub fn as_str(&self) -> Result<&'a str, ParseError> {
        from_utf8(self.as_bytes())
    }

    /// The decoded string, borrowed from the input when it holds no escapes
    /// and unescaped into `scratch` otherwise.
    ///
    /// # Example
    /// ```
    /// # use flashjson::{JsonString, JsonValue};
    /// let json = br#"["plain", "tab\tbed"]"#;
    /// let root = JsonValue::new(&json[..]);
    /// let mut scratch = [0u8; 32];
    /// let mut items = root.items();
    /// let plain = items.next().unwrap();
    /// assert_eq!(plain.to_json_string(&mut scratch), Ok(JsonString::Raw("plain")));
    /// let tabbed = items.next().unwrap();
    /// assert_eq!(tabbed.to_json_string(&mut scratch), Ok(JsonString::Decoded("tab\tbed")));
    /// ```
    pub fn to_json_string<'b>(
        &self,
        scratch: &'b mut [u8],
    ) -> Result<JsonString<'a, 'b>, ParseError> {
        let raw = self.as_bytes();
        if raw.contains(&b'\\') {
            self.unescape_into(scratch).map(JsonString::Decoded)
        } else {
            from_utf8(raw).map(JsonString::Raw)
        }
    }
}

impl<S: ?Sized, C> Clone for JsonValue<'_, S, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized, C> Copy for JsonValue<'_, S, C> {}

impl<S: ?Sized, C> fmt::Debug for JsonValue<'_, S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonValue")
            .field("span", &self.span.map(|span| span.range()))
            .field("quoted", &self.quoted)
            .finish()
    }
}

/// A view converts to `true` unless it is the "no value" view.
impl<S: CharSource + ?Sized, C: ScanConfig> From<JsonValue<'_, S, C>> for bool {
    fn from(value: JsonValue<'_, S, C>) -> Self {
        value.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(json: &[u8]) -> DirectValue<'_> {
        JsonValue::new(json)
    }

    #[test]
    fn test_construction_trims_whitespace_and_quotes() {
        let value = direct(b" \t\r\n\"hello\" \n");
        assert!(value.is_valid());
        assert!(value.is_quoted());
        assert_eq!(value.as_bytes(), b"hello");
        assert_eq!(value.raw_span(), Some(5..10));
    }

    #[test]
    fn test_only_one_layer_of_quotes_is_stripped() {
        let value = direct(br#""\"inner\"""#);
        assert_eq!(value.as_bytes(), br#"\"inner\""#);
    }

    #[test]
    fn test_whitespace_inside_quotes_is_kept() {
        let value = direct(br#"  "  padded  "  "#);
        assert_eq!(value.as_bytes(), b"  padded  ");
    }

    #[test]
    fn test_lone_quote_is_not_stripped() {
        let value = direct(b" \" ");
        assert!(!value.is_quoted());
        assert_eq!(value.as_bytes(), b"\"");
    }

    #[test]
    fn test_empty_string_value() {
        let value = direct(b"\"\"");
        assert!(value.is_valid());
        assert!(value.is_quoted());
        assert!(value.is_empty());
        assert!(!value.is_object());
        assert!(!value.is_array());
    }

    #[test]
    fn test_length_stops_at_nul() {
        let value = direct(b"[1, 2]\0garbage");
        assert_eq!(value.as_bytes(), b"[1, 2]");
        assert!(value.is_array());
    }

    #[test]
    fn test_at_offset() {
        let buffer: &[u8] = b"first\0 {\"k\": 1} \0";
        let value = JsonValue::at(buffer, 6);
        assert!(value.is_object());
        assert_eq!(value.as_bytes(), b"{\"k\": 1}");
    }

    #[test]
    fn test_from_span_is_clamped() {
        let buffer: &[u8] = b"[1]";
        let value = JsonValue::from_span(buffer, 1, 100);
        assert_eq!(value.as_bytes(), b"1]");
        let past_end = JsonValue::from_span(buffer, 10, 5);
        assert!(past_end.is_valid());
        assert!(past_end.is_empty());
    }

    #[test]
    fn test_classification() {
        assert!(direct(b"{}").is_object());
        assert!(direct(b" [ ] ").is_array());
        assert!(!direct(b"42").is_object());
        assert!(!direct(b"42").is_array());
        assert!(!direct(b"").is_object());
        assert!(!direct(b"   ").is_array());
    }

    #[test]
    fn test_invalid_view_is_inert() {
        let buffer: &[u8] = b"{\"a\": [1]}";
        let invalid: DirectValue = JsonValue::invalid(buffer);
        assert!(!invalid.is_valid());
        assert!(!invalid.is_object());
        assert!(!invalid.is_array());
        assert_eq!(invalid.len(), 0);
        assert_eq!(invalid.raw_span(), None);
        assert_eq!(invalid.as_bytes(), b"");
        assert_eq!(invalid.raw_bytes(), b"");
        assert_eq!(invalid.materialize(), Ok(String::new()));
        assert_eq!(invalid.items().count(), 0);
        assert_eq!(invalid.members().count(), 0);
        assert!(!invalid.get_property("a").is_valid());
        assert!(invalid.into_option().is_none());
        assert!(!bool::from(invalid));
    }

    #[test]
    fn test_trimmed_is_idempotent() {
        for json in [
            &b"  {\"a\": 1}  "[..],
            b"\"  spaced  \"",
            b"\"\\\"x\\\"\"",
            b"  42 ",
            b"\"",
            b"",
        ] {
            let value = direct(json);
            let again = value.trimmed();
            assert_eq!(again.raw_span(), value.raw_span(), "{:?}", json);
            assert_eq!(again.is_quoted(), value.is_quoted());
            assert_eq!(again.trimmed().raw_span(), value.raw_span());
        }
    }

    #[test]
    fn test_materialize_decodes_escapes() {
        let value = direct(br#""line1\nline2\t!\\""#);
        assert_eq!(value.materialize().unwrap(), "line1\nline2\t!\\");
        assert_eq!(value.materialize_bytes(), b"line1\nline2\t!\\");
        assert_eq!(value.raw_bytes(), br"line1\nline2\t!\\");
    }

    #[test]
    fn test_materialize_rejects_invalid_utf8() {
        let value = direct(&[b'"', 0xFF, b'"']);
        assert!(matches!(value.materialize(), Err(ParseError::InvalidUtf8(_))));
        assert_eq!(value.materialize_bytes(), [0xFFu8]);
    }

    #[test]
    fn test_to_json_string() {
        let mut scratch = [0u8; 8];
        let plain = direct(b"\"plain\"");
        assert_eq!(
            plain.to_json_string(&mut scratch),
            Ok(JsonString::Raw("plain"))
        );

        let escaped = direct(br#""a\nb""#);
        assert_eq!(
            escaped.to_json_string(&mut scratch),
            Ok(JsonString::Decoded("a\nb"))
        );

        let mut tiny = [0u8; 2];
        assert_eq!(
            escaped.to_json_string(&mut tiny),
            Err(ParseError::ScratchBufferFull)
        );
    }

    #[test]
    fn test_as_str() {
        assert_eq!(direct(b" \"text\" ").as_str(), Ok("text"));
        assert!(direct(&[0xFF]).as_str().is_err());
    }

    #[test]
    fn test_debug_output() {
        let value = direct(b" \"x\"");
        assert_eq!(
            format!("{:?}", value),
            "JsonValue { span: Some(2..3), quoted: true }"
        );
    }
}
