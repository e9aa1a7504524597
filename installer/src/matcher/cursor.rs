//! Non-backtracking prefix cursor over a filename.
//!
//! Each step consumes a literal (or the first of several alternatives that
//! matches) from the front of the remaining text and yields a new cursor.
//! A failed step yields `None`; callers chain steps with `?` so that any
//! failed expectation invalidates the whole match.

/// An immutable position within a filename.
///
/// # Examples
///
/// ```
/// use ghr_installer::matcher::cursor::Cursor;
///
/// let cursor = Cursor::new("tool-v1.0.0.zip")
///     .expect("tool")
///     .and_then(|c| c.expect_any(&["-", "_"]))
///     .expect("prefix matches");
/// assert_eq!(cursor.matched(), "tool-");
/// assert_eq!(cursor.remaining(), "v1.0.0.zip");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    /// Start a cursor at the beginning of `text`.
    #[must_use]
    pub const fn new(text: &'a str) -> Self {
        Self { text, offset: 0 }
    }

    /// Consume `literal` from the front of the remaining text.
    #[must_use]
    pub fn expect(self, literal: &str) -> Option<Self> {
        if !self.remaining().starts_with(literal) {
            return None;
        }
        Some(Self {
            text: self.text,
            offset: self.offset + literal.len(),
        })
    }

    /// Consume the first alternative that prefixes the remaining text.
    ///
    /// Alternatives are tried in order and the first hit is final.
    #[must_use]
    pub fn expect_any<S: AsRef<str>>(self, alternatives: &[S]) -> Option<Self> {
        let hit = self.peek_any(alternatives)?;
        self.expect(hit)
    }

    /// Return the first alternative that prefixes the remaining text
    /// without consuming it.
    #[must_use]
    pub fn peek_any<'s, S: AsRef<str>>(&self, alternatives: &'s [S]) -> Option<&'s str> {
        let remaining = self.remaining();
        alternatives
            .iter()
            .map(|alternative| alternative.as_ref())
            .find(|alternative| remaining.starts_with(*alternative))
    }

    /// Return the text consumed so far.
    #[must_use]
    pub fn matched(&self) -> &'a str {
        self.text.get(..self.offset).unwrap_or_default()
    }

    /// Return the text not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> &'a str {
        self.text.get(self.offset..).unwrap_or_default()
    }

    /// Return true once the whole text has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expect_advances_on_prefix() {
        let cursor = Cursor::new("abc").expect("ab").expect("prefix");
        assert_eq!(cursor.matched(), "ab");
        assert_eq!(cursor.remaining(), "c");
        assert!(!cursor.is_empty());
    }

    #[test]
    fn expect_fails_without_prefix() {
        assert!(Cursor::new("abc").expect("b").is_none());
    }

    #[test]
    fn expect_any_takes_first_matching_alternative() {
        let cursor = Cursor::new("1.0.0-linux")
            .expect_any(&["1.0", "1.0.0"])
            .expect("alternative matches");
        assert_eq!(cursor.matched(), "1.0");
    }

    #[test]
    fn failed_choice_is_not_retried() {
        // "1.0" wins the alternative, so a later "." delimiter is what follows.
        let result = Cursor::new("1.0.0-linux")
            .expect_any(&["1.0", "1.0.0"])
            .and_then(|c| c.expect("-"));
        assert!(result.is_none());
    }

    #[test]
    fn peek_any_does_not_consume() {
        let cursor = Cursor::new("sha256sum.txt");
        assert_eq!(cursor.peek_any(&["md5", "sha256"]), Some("sha256"));
        assert_eq!(cursor.remaining(), "sha256sum.txt");
    }

    #[test]
    fn is_empty_after_full_consumption() {
        let cursor = Cursor::new("ab").expect("ab").expect("prefix");
        assert!(cursor.is_empty());
        assert_eq!(cursor.remaining(), "");
    }
}
