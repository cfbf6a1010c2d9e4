use crate::document::Span;

use super::{Candidate, PatternKind, cursor::Cursor, is_word};

/// Phone number syntax constants.
pub struct Phone;

impl Phone {
    pub const PLUS: u8 = b'+';
    pub const OPEN: u8 = b'(';
    pub const SEPARATORS: &'static [u8] = b"()-. ";
    /// Longest run of separators between two digits, e.g. `") "`.
    pub const MAX_SEPARATOR_RUN: usize = 2;
    pub const SCHEME: &'static str = "tel:";
    pub const DEFAULT_MIN_DIGITS: usize = 7;
}

/// Finds phone number candidates in `text`, which starts at absolute
/// position `base`. Numbers with fewer than `min_digits` digits are ignored.
pub fn find(base: usize, text: &str, min_digits: usize) -> Vec<Candidate> {
    let mut cur = Cursor::new(text, base);
    let mut out = vec![];
    while !cur.eof() {
        if let Some(candidate) = try_parse_phone(&mut cur, min_digits) {
            out.push(candidate);
            continue;
        }
        cur.bump();
    }
    out
}

fn try_parse_phone(cur: &mut Cursor<'_>, min_digits: usize) -> Option<Candidate> {
    let first = cur.peek()?;
    if !(first.is_ascii_digit() || first == Phone::PLUS || first == Phone::OPEN) {
        return None;
    }
    if cur.prev().is_some_and(|b| is_word(b) || b == Phone::PLUS) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.i;
    let plus = first == Phone::PLUS;
    if plus {
        cur.bump();
    }

    let mut digits = String::new();
    let mut end = start;
    let mut run = 0;
    while let Some(b) = cur.peek() {
        if b.is_ascii_digit() {
            digits.push(b as char);
            run = 0;
            cur.bump();
            end = cur.i;
        } else if Phone::SEPARATORS.contains(&b) && run < Phone::MAX_SEPARATOR_RUN {
            run += 1;
            cur.bump();
        } else {
            break;
        }
    }

    let followed_by_word = cur.byte_at(end).is_some_and(is_word);
    if digits.len() < min_digits.max(1) || followed_by_word {
        *cur = saved;
        return None;
    }
    cur.i = end;

    let href = format!(
        "{}{}{digits}",
        Phone::SCHEME,
        if plus { "+" } else { "" }
    );
    Some(Candidate {
        span: Span::new(cur.base + start, cur.base + end),
        kind: PatternKind::Phone,
        href,
    })
}
