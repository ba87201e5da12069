// SPDX-License-Identifier: Apache-2.0

use log::trace;

use crate::{CharSource, JsonValue, ScanConfig};

/// Walks `object` once and returns the value of the first member whose name is
/// `name_len` bytes long and satisfies `name_matches(name_start)`.
///
/// The walk stops right after the matching member's value; the rest of the
/// object is never read.
fn find_property<'a, S, C, F>(
    object: &JsonValue<'a, S, C>,
    name_len: usize,
    name_matches: F,
) -> JsonValue<'a, S, C>
where
    S: CharSource + ?Sized,
    C: ScanConfig,
    F: Fn(usize) -> bool,
{
    if name_len == 0 || !object.is_object() {
        return JsonValue::invalid(object.source());
    }

    let found = object.entries().find_map(|(name, value)| {
        let span = name.raw_span()?;
        (span.len() == name_len && name_matches(span.start)).then_some(value)
    });

    found.unwrap_or_else(|| {
        trace!(
            "no property of length {} in object at {:?}",
            name_len,
            object.raw_span()
        );
        JsonValue::invalid(object.source())
    })
}

/// Property lookup
impl<'a, S: CharSource + ?Sized, C: ScanConfig> JsonValue<'a, S, C> {
    /// Returns the value of the first member called `name`, or an invalid view
    /// if this is not an object, `name` is empty, or there is no such member.
    ///
    /// Names are compared byte for byte against the raw member name, so an
    /// escaped name only matches its escaped spelling.
    ///
    /// # Example
    /// ```
    /// # use flashjson::JsonValue;
    /// let json = br#"{"a":1,"b":{"c":2},"d":[3,4]}"#;
    /// let root = JsonValue::new(&json[..]);
    /// assert_eq!(root.get_property("b").as_bytes(), br#"{"c":2}"#);
    /// assert_eq!(root.get_property("b").get_property("c").as_bytes(), b"2");
    /// assert!(!root.get_property("z").is_valid());
    /// ```
    pub fn get_property(&self, name: &str) -> Self {
        self.get_property_bytes(name.as_bytes())
    }

    /// Like [`get_property`](Self::get_property), for a name given as bytes.
    pub fn get_property_bytes(&self, name: &[u8]) -> Self {
        let source = self.source();
        find_property(self, name.len(), |start| source.equals(start, name))
    }

    /// Like [`get_property`](Self::get_property), for a NUL-terminated name
    /// stored at `offset` in another source, such as a [`PagedSource`] over
    /// constants kept in flash.
    ///
    /// [`PagedSource`]: crate::PagedSource
    pub fn get_property_in<T: CharSource + ?Sized>(&self, names: &T, offset: usize) -> Self {
        let source = self.source();
        let name_len = names.c_str_len(offset);
        find_property(self, name_len, |start| {
            (0..name_len).all(|i| source.read_byte(start + i) == names.read_byte(offset + i))
        })
    }
}
