// SPDX-License-Identifier: Apache-2.0

//! A single-pass JSON navigator for memory-constrained targets.
//!
//! `flashjson` never builds a document tree. A [`JsonValue`] is a trimmed span
//! of the original text; looking up a property or iterating a container walks
//! the raw bytes and hands back further spans of the same buffer.
//!
//! The text can live in ordinary RAM (any `[u8]`) or behind a [`PagedSource`],
//! which fronts slow, non-byte-addressable storage such as program flash with
//! a small read cache. Both go through the same [`CharSource`] primitives, so
//! every query behaves identically on either.
//!
//! ```rust
//! use flashjson::JsonValue;
//!
//! let json = br#"{"name": "sensor", "readings": [1, 2, 3]}"#;
//! let root = JsonValue::new(&json[..]);
//!
//! assert_eq!(root.get_property("name").as_bytes(), b"sensor");
//! assert_eq!(root.get_property("readings").items().count(), 3);
//! assert!(!root.get_property("missing").is_valid());
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod char_source;
pub use char_source::CharSource;

mod paged_source;
pub use paged_source::{PageRead, PagedSource, DEFAULT_WINDOW};

mod scan_config;
pub use scan_config::{DefaultConfig, DepthConfig, DepthCounter, SaturatingConfig, ScanConfig};

mod parse_error;
pub use parse_error::ParseError;

mod skip_scanner;

mod container_iter;
pub use container_iter::{ArrayItems, ObjectEntries, ObjectMembers};

mod property_lookup;

mod escape_processor;

mod json_string;
pub use json_string::JsonString;

mod json_value;
pub use json_value::{DirectValue, JsonValue, PagedValue};
