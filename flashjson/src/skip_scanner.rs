// SPDX-License-Identifier: Apache-2.0

use log::trace;

use crate::{CharSource, DepthCounter};

/// Returns the character that closes `open`: `}` for `{`, `]` for anything else.
pub(crate) fn closing_delimiter(open: u8) -> u8 {
    if open == b'{' {
        b'}'
    } else {
        b']'
    }
}

/// Bytes trimmed from both ends of a value.
pub(crate) fn is_json_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n')
}

/// Transient state of one forward skip.
#[derive(Debug, Default)]
struct SkipState<D> {
    /// Keeps track of `{}` nesting relative to where the skip started
    objects_depth: D,
    /// Keeps track of `[]` nesting relative to where the skip started
    array_depth: D,
    in_quotes: bool,
}

impl<D: DepthCounter> SkipState<D> {
    fn at_top_level(&self) -> bool {
        self.objects_depth.is_zero() && self.array_depth.is_zero()
    }

    fn track_nesting(&mut self, c: u8) {
        match c {
            b'[' => self.array_depth.increment(),
            b']' => self.array_depth.decrement(),
            b'{' => self.objects_depth.increment(),
            b'}' => self.objects_depth.decrement(),
            _ => {}
        }
    }
}

/// Advances from `pos` to just past the first top-level `target` before `end`.
///
/// `pos` normally sits right after an opening `{` or `[`, with `target` its
/// closing counterpart. Quoted regions are opaque and `{}`/`[]` nesting is
/// counted, so a `target` inside a nested structure or a string is ignored.
///
/// A quote preceded by a backslash never toggles the quote state. Only the one
/// previous byte is consulted, so a string ending in an escaped backslash
/// (`"a\\"`) looks unterminated.
///
/// Returns `end` if no match was found.
pub(crate) fn skip_to<S, D>(source: &S, mut pos: usize, end: usize, target: u8) -> usize
where
    S: CharSource + ?Sized,
    D: DepthCounter,
{
    let mut state = SkipState::<D>::default();
    let mut prev = 0u8;

    while pos < end {
        let c = source.read_byte(pos);
        pos += 1;

        if state.in_quotes {
            if c == b'"' && prev != b'\\' {
                state.in_quotes = false;
            }
        } else if c == b'"' && prev != b'\\' {
            state.in_quotes = true;
        } else if c == target && state.at_top_level() {
            return pos;
        } else {
            state.track_nesting(c);
        }
        prev = c;
    }

    trace!(
        "no closing {:?} before offset {} (depth {:?}/{:?}, in quotes: {})",
        target as char,
        end,
        state.objects_depth,
        state.array_depth,
        state.in_quotes
    );
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::num::Saturating;
    use test_log::test;

    fn skip(json: &[u8], from: usize, target: u8) -> usize {
        skip_to::<_, u8>(json, from, json.len(), target)
    }

    #[test]
    fn test_flat_object() {
        let json = br#"{"a":1}tail"#;
        assert_eq!(skip(json, 1, b'}'), 7);
    }

    #[test]
    fn test_nested_structures_are_skipped() {
        let json = br#"{"a":{"b":[1,{"c":[]}]},"d":2}"#;
        assert_eq!(skip(json, 1, b'}'), json.len());

        let json = br#"[[1,2],[3,[4]]],5"#;
        assert_eq!(skip(json, 1, b']'), 15);
    }

    #[test]
    fn test_delimiters_inside_quotes_are_ignored() {
        let json = br#"{"a":"}]{[,"}!"#;
        assert_eq!(skip(json, 1, b'}'), 13);
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let json = br#"{"a":"say \"}\" ok"}!"#;
        assert_eq!(skip(json, 1, b'}'), json.len() - 1);
    }

    #[test]
    fn test_escaped_backslash_before_quote_looks_unterminated() {
        // The closing quote follows a backslash, so the string never closes
        let json = br#"{"a":"x\\"} } "#;
        assert_eq!(skip(json, 1, b'}'), json.len());
    }

    #[test]
    fn test_custom_delimiter_at_top_level() {
        let json = br#" 1, [2,3], {"x":4,"y":5}, 6"#;
        assert_eq!(skip(json, 0, b','), 3);
        assert_eq!(skip(json, 3, b','), 10);
        assert_eq!(skip(json, 10, b','), 25);
    }

    #[test]
    fn test_unterminated_runs_to_end() {
        let json = br#"{"a":[1,2"#;
        assert_eq!(skip(json, 1, b'}'), json.len());
        let json = br#"{"a":"open}"#;
        assert_eq!(skip(json, 1, b'}'), json.len());
    }

    #[test]
    fn test_end_bound_is_respected() {
        let json = br#"{"a":1}"#;
        assert_eq!(skip_to::<_, u8>(&json[..], 1, 4, b'}'), 4);
        assert_eq!(skip_to::<_, u8>(&json[..], 5, 5, b'}'), 5);
    }

    #[test]
    fn test_unbalanced_closer_wraps_by_default() {
        // The stray ']' wraps the array depth, hiding the real '}'
        let json = br#"{"x":1]} tail"#;
        assert_eq!(skip_to::<_, u8>(&json[..], 1, json.len(), b'}'), json.len());
    }

    #[test]
    fn test_unbalanced_closer_saturates() {
        let json = br#"{"x":1]} tail"#;
        assert_eq!(
            skip_to::<_, Saturating<u8>>(&json[..], 1, json.len(), b'}'),
            8
        );
    }

    #[test]
    fn test_helpers() {
        assert_eq!(closing_delimiter(b'{'), b'}');
        assert_eq!(closing_delimiter(b'['), b']');
        assert!(is_json_whitespace(b'\n'));
        assert!(!is_json_whitespace(b'"'));
        assert!(!is_json_whitespace(0));
    }
}
