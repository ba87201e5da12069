// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Range;

use log::trace;

use crate::json_value::Span;
use crate::skip_scanner::{closing_delimiter, is_json_whitespace, skip_to};
use crate::{CharSource, JsonValue, ScanConfig};

/// Iterator over the elements of an array, created by [`JsonValue::items`].
///
/// Scalars end at a top-level `,` or `]`; a nested `{...}` or `[...]` is
/// skipped in one step and yielded bracket-inclusive. Every element is a
/// trimmed view, so string elements come without their quotes.
#[derive(Debug)]
pub struct ArrayItems<'a, S: ?Sized, C> {
    source: &'a S,
    pos: usize,
    end: usize,
    /// Where the current scalar element began
    item_start: usize,
    /// Non-whitespace seen since the last element boundary
    pending: bool,
    in_quotes: bool,
    prev: u8,
    done: bool,
    _config: PhantomData<C>,
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> ArrayItems<'a, S, C> {
    /// `body` runs from just past the `[` to the end of the array's span.
    /// `None` yields nothing.
    pub(crate) fn new(source: &'a S, body: Option<Range<usize>>) -> Self {
        let done = body.is_none();
        let Range { start, end } = body.unwrap_or(0..0);
        Self {
            source,
            pos: start,
            end,
            item_start: start,
            pending: false,
            in_quotes: false,
            prev: 0,
            done,
            _config: PhantomData,
        }
    }

    fn item(&self, range: Range<usize>) -> JsonValue<'a, S, C> {
        JsonValue::with_config_span(
            self.source,
            range.start,
            range.end.saturating_sub(range.start),
        )
    }

    fn take_pending(&mut self, item_end: usize) -> Option<JsonValue<'a, S, C>> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        Some(self.item(self.item_start..item_end))
    }
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> Iterator for ArrayItems<'a, S, C> {
    type Item = JsonValue<'a, S, C>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && self.pos < self.end {
            let c = self.source.read_byte(self.pos);
            self.pos += 1;

            if self.in_quotes {
                if c == b'"' && self.prev != b'\\' {
                    self.in_quotes = false;
                }
                self.prev = c;
                continue;
            }

            match c {
                b'"' if self.prev != b'\\' => {
                    self.in_quotes = true;
                    self.pending = true;
                }
                b'{' | b'[' => {
                    let start = self.pos - 1;
                    let close = closing_delimiter(c);
                    self.pos = skip_to::<S, C::Counter>(self.source, self.pos, self.end, close);
                    self.prev = close;
                    self.pending = false;
                    self.item_start = self.pos;
                    return Some(self.item(start..self.pos));
                }
                b',' => {
                    let item = self.take_pending(self.pos - 1);
                    self.item_start = self.pos;
                    self.prev = c;
                    if item.is_some() {
                        return item;
                    }
                    continue;
                }
                b']' => {
                    self.done = true;
                    return self.take_pending(self.pos - 1);
                }
                _ if !is_json_whitespace(c) => self.pending = true,
                _ => {}
            }
            self.prev = c;
        }

        if !self.done {
            trace!("array body ended at {} without a closing ']'", self.end);
            self.done = true;
        }
        None
    }
}

impl<S: CharSource + ?Sized, C: ScanConfig> FusedIterator for ArrayItems<'_, S, C> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseStep {
    None,
    Name,
    Value,
}

/// Iterator over the members of an object as `(name, value)` views, created by
/// [`JsonValue::entries`].
///
/// Neither view allocates. The name is the quote-stripped span of the member
/// name, escapes untouched.
#[derive(Debug)]
pub struct ObjectEntries<'a, S: ?Sized, C> {
    source: &'a S,
    pos: usize,
    end: usize,
    step: ParseStep,
    in_quotes: bool,
    /// A name was captured and its member has not been yielded yet
    found_name: bool,
    prev: u8,
    quote_start: usize,
    name: Span,
    value_start: usize,
    done: bool,
    _config: PhantomData<C>,
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> ObjectEntries<'a, S, C> {
    /// `body` runs from just past the `{` to the end of the object's span.
    /// `None` yields nothing.
    pub(crate) fn new(source: &'a S, body: Option<Range<usize>>) -> Self {
        let done = body.is_none();
        let Range { start, end } = body.unwrap_or(0..0);
        Self {
            source,
            pos: start,
            end,
            step: ParseStep::None,
            in_quotes: false,
            found_name: false,
            prev: 0,
            quote_start: start,
            name: Span { start, len: 0 },
            value_start: start,
            done,
            _config: PhantomData,
        }
    }

    fn take_entry(
        &mut self,
        value_end: usize,
    ) -> Option<(JsonValue<'a, S, C>, JsonValue<'a, S, C>)> {
        if !self.found_name || self.step != ParseStep::Value {
            return None;
        }
        self.found_name = false;
        let name = JsonValue::from_raw_parts(self.source, self.name, true);
        let value = JsonValue::with_config_span(
            self.source,
            self.value_start,
            value_end.saturating_sub(self.value_start),
        );
        Some((name, value))
    }
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> Iterator for ObjectEntries<'a, S, C> {
    type Item = (JsonValue<'a, S, C>, JsonValue<'a, S, C>);

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done && self.pos < self.end {
            let c = self.source.read_byte(self.pos);
            self.pos += 1;

            if self.in_quotes {
                if c == b'"' && self.prev != b'\\' {
                    self.in_quotes = false;
                    if self.step == ParseStep::Name {
                        self.name = Span {
                            start: self.quote_start,
                            len: self.pos - 1 - self.quote_start,
                        };
                        self.found_name = true;
                    }
                }
                self.prev = c;
                continue;
            }

            match c {
                b'"' if self.prev != b'\\' => {
                    if self.step == ParseStep::None {
                        self.step = ParseStep::Name;
                    }
                    self.quote_start = self.pos;
                    self.in_quotes = true;
                }
                b'{' | b'[' => {
                    let close = closing_delimiter(c);
                    self.pos = skip_to::<S, C::Counter>(self.source, self.pos, self.end, close);
                    self.prev = close;
                    if let Some(entry) = self.take_entry(self.pos) {
                        return Some(entry);
                    }
                    continue;
                }
                b',' => {
                    let entry = self.take_entry(self.pos - 1);
                    self.step = ParseStep::None;
                    self.found_name = false;
                    self.prev = c;
                    if entry.is_some() {
                        return entry;
                    }
                    continue;
                }
                b'}' => {
                    self.done = true;
                    return self.take_entry(self.pos - 1);
                }
                b':' => {
                    self.step = ParseStep::Value;
                    self.value_start = self.pos;
                }
                _ => {}
            }
            self.prev = c;
        }

        if !self.done {
            trace!("object body ended at {} without a closing '}}'", self.end);
            self.done = true;
        }
        None
    }
}

impl<S: CharSource + ?Sized, C: ScanConfig> FusedIterator for ObjectEntries<'_, S, C> {}

/// Iterator over the members of an object with owned names, created by
/// [`JsonValue::members`].
///
/// Names are copied out raw; bytes that are not UTF-8 are replaced with
/// U+FFFD so iteration never fails.
#[derive(Debug)]
pub struct ObjectMembers<'a, S: ?Sized, C> {
    entries: ObjectEntries<'a, S, C>,
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> ObjectMembers<'a, S, C> {
    pub(crate) fn new(entries: ObjectEntries<'a, S, C>) -> Self {
        Self { entries }
    }
}

fn lossy_string(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

impl<'a, S: CharSource + ?Sized, C: ScanConfig> Iterator for ObjectMembers<'a, S, C> {
    type Item = (String, JsonValue<'a, S, C>);

    fn next(&mut self) -> Option<Self::Item> {
        let (name, value) = self.entries.next()?;
        Some((lossy_string(name.raw_bytes()), value))
    }
}

impl<S: CharSource + ?Sized, C: ScanConfig> FusedIterator for ObjectMembers<'_, S, C> {}
