//! Span resolution: turns overlapping detector candidates into the final,
//! non-overlapping set of link targets for one segment.

use crate::{
    detect::{Candidate, PatternKind},
    document::Span,
};

/// An accepted candidate: where a Link mark should be and what it points to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LinkTarget {
    pub span: Span,
    pub href: String,
}

impl LinkTarget {
    pub fn new(span: Span, href: impl Into<String>) -> Self {
        Self {
            span,
            href: href.into(),
        }
    }
}

/// Picks non-overlapping targets from `candidates`.
///
/// Candidates are taken earliest first, then longest first, then by
/// [`PatternKind`] priority. A candidate is accepted when it does not
/// intersect anything accepted before it. Accepted targets that touch and
/// share an href are merged into one, since the document would merge the
/// two Link runs anyway.
pub fn resolve(mut candidates: Vec<Candidate>) -> Vec<LinkTarget> {
    candidates.sort_by_key(|c| sort_key(c));

    let mut accepted: Vec<LinkTarget> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.span.is_empty() {
            continue;
        }
        match accepted.last_mut() {
            Some(last) if last.span.intersects(candidate.span) => continue,
            Some(last) if last.span.end == candidate.span.start && last.href == candidate.href => {
                last.span.end = candidate.span.end;
            }
            _ => accepted.push(LinkTarget::new(candidate.span, candidate.href)),
        }
    }
    accepted
}

fn sort_key(c: &Candidate) -> (usize, std::cmp::Reverse<usize>, PatternKind) {
    (c.span.start, std::cmp::Reverse(c.span.len()), c.kind)
}
