// SPDX-License-Identifier: Apache-2.0

//! A [`CharSource`] for memory that cannot be dereferenced byte by byte.
//!
//! On targets like AVR, constant data placed in program flash has to be copied
//! into RAM before it can be looked at. [`PagedSource`] keeps a small window of
//! the backing store cached; reads inside the window are served from RAM and
//! a read outside it copies a fresh window starting at the requested offset.
//!
//! The backing store only has to implement [`PageRead`]:
//!
//! - **Program flash**: wrap the platform's `memcpy_P`-style copy routine
//! - **External EEPROM / SPI flash**: issue a bulk read over the bus
//! - **Plain slices**: `[u8]` implements [`PageRead`] for testing
//!
//! # Example
//!
//! ```rust
//! use flashjson::{JsonValue, PagedSource};
//!
//! static CONFIG: &[u8] = br#"{"baud": 9600, "mode": "8N1"}"#;
//!
//! let flash = PagedSource::new(CONFIG);
//! let root = JsonValue::new(&flash);
//! assert_eq!(root.get_property("mode").materialize().unwrap(), "8N1");
//! ```

use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use log::trace;

use crate::CharSource;

/// Window size used by [`PagedSource::new`].
pub const DEFAULT_WINDOW: usize = 4;

/// Bulk, random-access reads from a slow backing store.
pub trait PageRead {
    /// Total number of bytes in the store.
    fn len(&self) -> usize;

    /// Returns true if the store holds no bytes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies bytes starting at `offset` into `buf` and returns how many were copied.
    ///
    /// Fewer than `buf.len()` bytes are copied only when the end of the store is
    /// reached; the rest of `buf` is left untouched.
    fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize;
}

impl PageRead for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        let src = self.get(offset..).unwrap_or(&[]);
        let count = src.len().min(buf.len());
        // Use zip to avoid copy_from_slice panic checks
        for (dst, &byte) in buf.iter_mut().zip(src.iter()) {
            *dst = byte;
        }
        count
    }
}

impl<T: PageRead + ?Sized> PageRead for &T {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        (**self).read_at(offset, buf)
    }
}

/// A page-cached [`CharSource`] over a [`PageRead`] backing store.
///
/// The cache is `N` bytes wide and always holds the most recently loaded
/// window. It lives in a [`Cell`], so reads take `&self` but the source is not
/// `Sync`: concurrent scans need independent `PagedSource` instances.
#[derive(Debug)]
pub struct PagedSource<B, const N: usize = DEFAULT_WINDOW> {
    backing: B,
    cache: Cell<[u8; N]>,
    /// Backing-store offset of `cache[0]`, `None` until the first read.
    window: Cell<Option<usize>>,
}

impl<B: PageRead> PagedSource<B, DEFAULT_WINDOW> {
    /// Creates a paged source with the default 4-byte window.
    pub fn new(backing: B) -> Self {
        Self::with_window(backing)
    }
}

impl<B: PageRead, const N: usize> PagedSource<B, N> {
    const WINDOW_NOT_EMPTY: () = assert!(N > 0, "PagedSource window must hold at least one byte");

    /// Creates a paged source with an `N`-byte window.
    ///
    /// # Example
    /// ```
    /// # use flashjson::PagedSource;
    /// let flash = PagedSource::<_, 16>::with_window(&b"[1, 2, 3]"[..]);
    /// ```
    pub fn with_window(backing: B) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_NOT_EMPTY;
        Self {
            backing,
            cache: Cell::new([0; N]),
            window: Cell::new(None),
        }
    }

    /// Backing-store offset of the currently cached window, if any.
    pub fn cached_window(&self) -> Option<usize> {
        self.window.get()
    }

    /// The backing store this source reads from.
    pub fn backing(&self) -> &B {
        &self.backing
    }

    /// Consumes the source and returns its backing store.
    pub fn into_inner(self) -> B {
        self.backing
    }

    fn refill(&self, pos: usize) -> [u8; N] {
        let mut page = [0u8; N];
        let copied = self.backing.read_at(pos, &mut page);
        trace!("page refill at {} ({} of {} bytes)", pos, copied, N);
        self.cache.set(page);
        self.window.set(Some(pos));
        page
    }
}

impl<B: PageRead, const N: usize> CharSource for PagedSource<B, N> {
    fn len(&self) -> usize {
        self.backing.len()
    }

    fn read_byte(&self, pos: usize) -> u8 {
        let cached = self
            .window
            .get()
            .and_then(|start| pos.checked_sub(start))
            .filter(|&offset| offset < N);
        match cached {
            Some(offset) => self.cache.get().get(offset).copied().unwrap_or(0),
            None => self.refill(pos).first().copied().unwrap_or(0),
        }
    }

    /// Bulk copy straight from the backing store; the cache is left alone.
    fn read_bytes(&self, pos: usize, len: usize) -> Vec<u8> {
        let end = pos.saturating_add(len).min(self.backing.len());
        let mut out = vec![0u8; end.saturating_sub(pos)];
        let copied = self.backing.read_at(pos, &mut out);
        out.truncate(copied);
        out
    }
}
