// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;

/// Read access to a logical buffer of JSON text.
///
/// Every scan in this crate is written against these primitives only, so the
/// same code runs whether the bytes are a plain slice in RAM or sit behind a
/// page cache (see [`PagedSource`](crate::PagedSource)).
///
/// Positions are byte offsets into the buffer. Reading at or past [`len`]
/// yields `0`, exactly like hitting a NUL terminator, so no read panics.
///
/// [`len`]: CharSource::len
pub trait CharSource {
    /// Number of addressable bytes.
    fn len(&self) -> usize;

    /// Returns true if the buffer holds no bytes at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads the byte at `pos`, or `0` when `pos` is out of range.
    fn read_byte(&self, pos: usize) -> u8;

    /// Copies `len` bytes starting at `pos` into a new vector.
    ///
    /// The copy stops early at the end of the buffer.
    fn read_bytes(&self, pos: usize, len: usize) -> Vec<u8> {
        let end = pos.saturating_add(len).min(self.len());
        (pos..end).map(|i| self.read_byte(i)).collect()
    }

    /// Returns true if the `other.len()` bytes at `pos` are equal to `other`.
    fn equals(&self, pos: usize, other: &[u8]) -> bool {
        match pos.checked_add(other.len()) {
            Some(end) if end <= self.len() => other
                .iter()
                .enumerate()
                .all(|(i, &expected)| self.read_byte(pos.saturating_add(i)) == expected),
            _ => false,
        }
    }

    /// Length of the NUL-terminated string starting at `pos`.
    ///
    /// The end of the buffer also terminates the string.
    fn c_str_len(&self, pos: usize) -> usize {
        let mut end = pos;
        while end < self.len() && self.read_byte(end) != 0 {
            end += 1;
        }
        end.saturating_sub(pos)
    }
}

/// The direct source: ordinary addressable memory.
impl CharSource for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline]
    fn read_byte(&self, pos: usize) -> u8 {
        self.get(pos).copied().unwrap_or(0)
    }

    fn read_bytes(&self, pos: usize, len: usize) -> Vec<u8> {
        let end = pos.saturating_add(len).min(<[u8]>::len(self));
        self.get(pos..end).map(<[u8]>::to_vec).unwrap_or_default()
    }

    fn equals(&self, pos: usize, other: &[u8]) -> bool {
        pos.checked_add(other.len())
            .and_then(|end| self.get(pos..end))
            .is_some_and(|window| window == other)
    }

    fn c_str_len(&self, pos: usize) -> usize {
        self.get(pos..).map_or(0, |rest| {
            rest.iter().position(|&b| b == 0).unwrap_or(rest.len())
        })
    }
}
