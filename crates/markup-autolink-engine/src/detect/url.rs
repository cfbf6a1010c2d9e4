use crate::document::Span;

use super::{
    Candidate, PatternKind,
    cursor::Cursor,
    host::{is_host_byte, valid_host_len},
    is_word,
};

/// URL syntax constants.
pub struct Url;

impl Url {
    /// Recognised schemes, longest first so `https://` is not read as `http`.
    pub const SCHEMES: [&'static [u8]; 2] = [b"https://", b"http://"];
    pub const PATH: u8 = b'/';
    /// Prepended to scheme-less matches such as `www.example.com`.
    pub const DEFAULT_SCHEME: &'static str = "https://";
}

/// Finds URL candidates in `text`, which starts at absolute position `base`.
pub fn find(base: usize, text: &str) -> Vec<Candidate> {
    let mut cur = Cursor::new(text, base);
    let mut out = vec![];
    while !cur.eof() {
        if let Some(candidate) = try_parse_url(&mut cur) {
            out.push(candidate);
            continue;
        }
        if cur.at_word_start() {
            skip_rejected_host(&mut cur);
        } else {
            cur.bump();
        }
    }
    out
}

/// Moves past a host run that cannot hold a valid host.
///
/// Any later word start inside the run sees a tail of the same labels, so it
/// fails the same way. Only a run after an empty label (`a..example.com`)
/// can still match, so the skip stops there.
fn skip_rejected_host(cur: &mut Cursor<'_>) {
    let start = cur.i;
    let mut end = start;
    while cur.byte_at(end).is_some_and(is_host_byte) {
        end += 1;
    }
    let raw_host = &cur.s[start..end];
    if valid_host_len(raw_host).is_some() {
        cur.bump();
        return;
    }
    let skip = raw_host.find("..").unwrap_or(raw_host.len()).max(1);
    cur.bump_n(skip);
}

/// Attempts to parse a URL starting at the current position.
///
/// On success the cursor ends up after the match; on failure it is restored.
fn try_parse_url(cur: &mut Cursor<'_>) -> Option<Candidate> {
    if !cur.at_word_start() {
        return None;
    }

    let saved = cur.clone();
    let start = cur.i;
    let scheme_len = Url::SCHEMES
        .iter()
        .find(|scheme| cur.starts_with_ignore_case(scheme))
        .map(|scheme| scheme.len());
    if let Some(len) = scheme_len {
        cur.bump_n(len);
    }

    let host_start = cur.i;
    cur.bump_while(is_host_byte);
    let raw_host = &cur.s[host_start..cur.i];
    let Some(host_len) = valid_host_len(raw_host) else {
        *cur = saved;
        return None;
    };

    let bytes = cur.s.as_bytes();
    let mut end = host_start + host_len;
    if host_len == raw_host.len() && bytes.get(end) == Some(&Url::PATH) {
        end = path_end(bytes, end);
    }
    if bytes.get(end).is_some_and(|&b| is_word(b)) {
        *cur = saved;
        return None;
    }
    cur.i = end;

    let matched = &cur.s[start..end];
    let href = if scheme_len.is_some() {
        matched.to_string()
    } else {
        format!("{}{matched}", Url::DEFAULT_SCHEME)
    };
    Some(Candidate {
        span: Span::new(cur.base + start, cur.base + end),
        kind: PatternKind::Url,
        href,
    })
}

/// The path runs to the next whitespace, minus trailing punctuation, so a
/// sentence-ending `.` or a closing `)` stays outside the link.
fn path_end(bytes: &[u8], slash: usize) -> usize {
    let mut end = slash;
    while bytes.get(end).is_some_and(|b| !b.is_ascii_whitespace()) {
        end += 1;
    }
    while end > slash && !is_word(bytes[end - 1]) {
        end -= 1;
    }
    end
}
