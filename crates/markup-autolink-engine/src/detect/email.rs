use crate::document::Span;

use super::{
    Candidate, PatternKind,
    host::{is_host_byte, valid_host_len},
    is_word,
};

/// Email syntax constants.
pub struct Email;

impl Email {
    pub const AT: u8 = b'@';
    pub const SCHEME: &'static str = "mailto:";
}

fn is_local_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'%' | b'+' | b'-')
}

/// Finds email candidates in `text`, which starts at absolute position `base`.
///
/// Scans from each `@` outwards: the local part backwards, the host forwards.
/// Matches never overlap; a local part cannot reach into the previous match.
pub fn find(base: usize, text: &str) -> Vec<Candidate> {
    let bytes = text.as_bytes();
    let mut out = vec![];
    let mut floor = 0;

    for at in 0..bytes.len() {
        if bytes[at] != Email::AT || at < floor {
            continue;
        }

        let mut start = at;
        while start > floor && is_local_byte(bytes[start - 1]) {
            start -= 1;
        }
        // the match starts on a word character, like a `\b` would require
        while start < at && !bytes[start].is_ascii_alphanumeric() {
            start += 1;
        }
        if start == at || (start > 0 && is_word(bytes[start - 1])) {
            continue;
        }

        let host_start = at + 1;
        let mut host_end = host_start;
        while host_end < bytes.len() && is_host_byte(bytes[host_end]) {
            host_end += 1;
        }
        let Some(host_len) = valid_host_len(&text[host_start..host_end]) else {
            continue;
        };
        let end = host_start + host_len;
        if bytes.get(end).is_some_and(|&b| is_word(b)) {
            continue;
        }

        out.push(Candidate {
            span: Span::new(base + start, base + end),
            kind: PatternKind::Email,
            href: format!("{}{}", Email::SCHEME, &text[start..end]),
        });
        floor = end;
    }
    out
}
