//! CFI ordering-key extraction
//!
//! Reduces a CFI string to the sequence of integers along its path, skipping
//! `[...]` assertions so that IDs like `chapter_4` contribute no digits.
//!
//! Grammar handled (permissive):
//! ```text
//! cfi     = "epubcfi(" body ")"
//! body    = (step | offset | ",")*
//! step    = "/" number [assertion] | "!" [assertion]
//! offset  = ":" number | "~" number | "@" number ":" number
//! assertion = "[" text "]"        (text may escape "]" with "^")
//! ```
//! Anything that does not fit is not an error: the whole key degrades to
//! [`FALLBACK_KEY`].

/// Key returned for malformed, foreign, or digit-free locations.
///
/// Records carrying this key tie with each other and sort ahead of any real
/// path; stable sorting keeps their fetch order.
pub const FALLBACK_KEY: &[u64] = &[0];

/// Scanner state over the CFI body
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume a run of ASCII digits, returning None on overflow
    fn scan_number(&mut self) -> Option<u64> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return None;
        }

        self.input[start..self.pos].parse().ok()
    }

    /// Skip a bracketed assertion, honoring "^" escapes.
    /// Returns false if the bracket never closes.
    fn skip_assertion(&mut self) -> bool {
        debug_assert_eq!(self.peek(), Some('['));
        self.advance();

        let mut escaped = false;
        while let Some(ch) = self.advance() {
            if escaped {
                escaped = false;
            } else if ch == '^' {
                escaped = true;
            } else if ch == ']' {
                return true;
            }
        }
        false
    }
}

/// Extract the lexicographic ordering key from a location string.
///
/// Every digit group in the CFI body contributes one element, left to right,
/// with bracketed assertion text excluded. Returns `[0]` when the string
/// lacks the `epubcfi(...)` wrapper, contains an unclosed bracket or an
/// out-of-range number, or yields no digits at all.
pub fn ordering_key(location: &str) -> Vec<u64> {
    extract_key(location).unwrap_or_else(|| FALLBACK_KEY.to_vec())
}

fn extract_key(location: &str) -> Option<Vec<u64>> {
    let body = location
        .trim()
        .strip_prefix("epubcfi(")?
        .strip_suffix(')')?;

    let mut scanner = Scanner::new(body);
    let mut key = Vec::new();

    while let Some(ch) = scanner.peek() {
        if ch == '[' {
            if !scanner.skip_assertion() {
                return None;
            }
        } else if ch.is_ascii_digit() {
            key.push(scanner.scan_number()?);
        } else {
            scanner.advance();
        }
    }

    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_path() {
        assert_eq!(ordering_key("epubcfi(/6/4!/4/2)"), vec![6, 4, 4, 2]);
    }

    #[test]
    fn test_full_shape_with_offsets() {
        // prefix(N1!N2[label]/N3,:N4,:N5) -> [N1, N2, N3, N4, N5]
        assert_eq!(
            ordering_key("epubcfi(6!12[chapter_4]/4,:7,:19)"),
            vec![6, 12, 4, 7, 19]
        );
    }

    #[test]
    fn test_label_digits_excluded() {
        assert_eq!(
            ordering_key("epubcfi(/6/12[chapter_4]!/4/10/1:0)"),
            vec![6, 12, 4, 10, 1, 0]
        );
    }

    #[test]
    fn test_escaped_bracket_in_label() {
        assert_eq!(
            ordering_key("epubcfi(/6/4[id^]9]!/2)"),
            vec![6, 4, 2]
        );
    }

    #[test]
    fn test_range_cfi() {
        assert_eq!(
            ordering_key("epubcfi(/6/4!/4/2,/1:0,/1:10)"),
            vec![6, 4, 4, 2, 1, 0, 1, 10]
        );
    }

    #[test]
    fn test_missing_prefix_falls_back() {
        assert_eq!(ordering_key("/6/4!/4/2"), vec![0]);
    }

    #[test]
    fn test_missing_paren_falls_back() {
        assert_eq!(ordering_key("epubcfi(/6/4"), vec![0]);
    }

    #[test]
    fn test_empty_and_garbage_fall_back() {
        assert_eq!(ordering_key(""), vec![0]);
        assert_eq!(ordering_key("not a location"), vec![0]);
    }

    #[test]
    fn test_no_digits_falls_back() {
        assert_eq!(ordering_key("epubcfi(/!/)"), vec![0]);
        assert_eq!(ordering_key("epubcfi([only_a_label])"), vec![0]);
    }

    #[test]
    fn test_unclosed_bracket_falls_back() {
        assert_eq!(ordering_key("epubcfi(/6/4[oops!/4/2)"), vec![0]);
    }

    #[test]
    fn test_overflowing_number_falls_back() {
        assert_eq!(ordering_key("epubcfi(/99999999999999999999999)"), vec![0]);
    }

    #[test]
    fn test_whitespace_tolerated() {
        assert_eq!(ordering_key("  epubcfi(/6/2)  "), vec![6, 2]);
    }
}
