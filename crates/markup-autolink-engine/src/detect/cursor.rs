use super::is_word;

/// A byte cursor for the pattern tokenizers with absolute position tracking.
///
/// Operates over one text run while tracking the absolute document position
/// of each byte (via `base` offset).
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The text being scanned.
    pub s: &'a str,
    /// Absolute position of `s[0]` in the document.
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s` with the given base offset.
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Returns the current absolute position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    /// Returns true if at end of string.
    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.byte_at(self.i)
    }

    /// The byte before the current one, if any.
    pub fn prev(&self) -> Option<u8> {
        self.i.checked_sub(1).and_then(|j| self.byte_at(j))
    }

    /// Any byte of the run by local index.
    pub fn byte_at(&self, j: usize) -> Option<u8> {
        self.s.as_bytes().get(j).copied()
    }

    /// True if the remaining input starts with `pat`, ignoring ASCII case.
    pub fn starts_with_ignore_case(&self, pat: &[u8]) -> bool {
        self.s.as_bytes()[self.i.min(self.s.len())..]
            .get(..pat.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(pat))
    }

    /// True at an ASCII word boundary followed by an alphanumeric byte: the
    /// only place a URL or email match may begin.
    pub fn at_word_start(&self) -> bool {
        self.peek().is_some_and(|b| b.is_ascii_alphanumeric()) && !self.prev().is_some_and(is_word)
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Advances past every byte matching `pred`.
    pub fn bump_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.i += 1;
        }
    }
}
