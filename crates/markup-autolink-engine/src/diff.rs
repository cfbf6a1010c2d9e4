//! # Mark Diff Engine
//!
//! Compares the Link marks a segment has with the ones its text implies and
//! emits the operations that turn one into the other. Stale links are removed
//! before new ones are added, and equal sets produce nothing.

use std::collections::BTreeSet;

use crate::{
    document::{Mark, MarkKind, Span},
    resolve::LinkTarget,
    transaction::Operation,
    walker::Segment,
};

/// The Link marks currently present in `segment`.
///
/// Runs next to each other with the same href form one target, so a link
/// split by bold text in its middle is still a single `(span, href)` pair.
/// A Link without an href counts as one with an empty href, which no
/// detector produces, so it is always removed.
pub fn current_links(segment: &Segment<'_>) -> Vec<LinkTarget> {
    let mut out: Vec<LinkTarget> = vec![];
    for run in &segment.runs {
        let Some(link) = run.marks.get(MarkKind::Link) else {
            continue;
        };
        let href = link.href().unwrap_or_default();
        match out.last_mut() {
            Some(last) if last.span.end == run.start && last.href == href => {
                last.span.end = run.end();
            }
            _ => out.push(LinkTarget::new(run.span(), href)),
        }
    }
    out
}

/// Operations turning `current` into `desired`: removes first, then adds,
/// each in position order.
pub fn diff_links(current: &[LinkTarget], desired: &[LinkTarget]) -> Vec<Operation> {
    let current: BTreeSet<&LinkTarget> = current.iter().collect();
    let desired: BTreeSet<&LinkTarget> = desired.iter().collect();

    let removes = current.difference(&desired).map(|t| Operation::RemoveMark {
        span: t.span,
        kind: MarkKind::Link,
    });
    let adds = desired.difference(&current).map(|t| Operation::AddMark {
        span: t.span,
        mark: Mark::link(t.href.clone()),
    });
    removes.chain(adds).collect()
}

/// Convenience for a segment whose desired targets are already resolved.
pub fn diff_segment(segment: &Segment<'_>, desired: &[LinkTarget]) -> Vec<Operation> {
    diff_links(&current_links(segment), desired)
}

/// Extent of everything an operation list touches, for logging.
pub(crate) fn extent(ops: &[Operation]) -> Option<Span> {
    let start = ops.iter().map(|op| op.span().start).min()?;
    let end = ops.iter().map(|op| op.span().end).max()?;
    Some(Span::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Node};
    use crate::walker::{TextWalker, segments};
    use pretty_assertions::assert_eq;

    fn first_segment_links(doc: &Document) -> Vec<LinkTarget> {
        let segment = segments(TextWalker::new(doc)).next().unwrap();
        current_links(&segment)
    }

    #[test]
    fn split_link_is_one_target() {
        let doc = Document::new(vec![Node::paragraph(vec![
            Node::text("at "),
            Node::marked("exa", [Mark::link("https://example.com")]),
            Node::marked(
                "mple",
                [Mark::link("https://example.com"), Mark::new(MarkKind::Bold)],
            ),
            Node::marked(".com", [Mark::link("https://example.com")]),
        ])]);
        assert_eq!(
            first_segment_links(&doc),
            vec![LinkTarget::new(Span::new(3, 14), "https://example.com")]
        );
    }

    #[test]
    fn touching_links_with_different_hrefs_stay_apart() {
        let doc = Document::new(vec![Node::paragraph(vec![
            Node::marked("a", [Mark::link("https://a.io")]),
            Node::marked("b", [Mark::link("https://b.io")]),
        ])]);
        assert_eq!(
            first_segment_links(&doc),
            vec![
                LinkTarget::new(Span::new(0, 1), "https://a.io"),
                LinkTarget::new(Span::new(1, 2), "https://b.io"),
            ]
        );
    }

    #[test]
    fn link_without_href_is_removed() {
        let doc = Document::new(vec![Node::paragraph(vec![
            Node::text("plain "),
            Node::marked("words", [Mark::new(MarkKind::Link)]),
        ])]);
        let current = first_segment_links(&doc);
        assert_eq!(current, vec![LinkTarget::new(Span::new(6, 11), "")]);
        assert_eq!(
            diff_links(&current, &[]),
            vec![Operation::RemoveMark {
                span: Span::new(6, 11),
                kind: MarkKind::Link,
            }]
        );
    }

    #[test]
    fn equal_sets_produce_no_operations() {
        let targets = vec![LinkTarget::new(Span::new(0, 4), "https://a.io")];
        assert_eq!(diff_links(&targets, &targets), vec![]);
    }

    #[test]
    fn removes_come_before_adds() {
        let current = vec![
            LinkTarget::new(Span::new(10, 20), "https://stale.io"),
            LinkTarget::new(Span::new(0, 4), "https://a.io"),
        ];
        let desired = vec![
            LinkTarget::new(Span::new(0, 4), "https://a.io"),
            LinkTarget::new(Span::new(10, 18), "https://fresh.io"),
        ];
        assert_eq!(
            diff_links(&current, &desired),
            vec![
                Operation::RemoveMark {
                    span: Span::new(10, 20),
                    kind: MarkKind::Link,
                },
                Operation::AddMark {
                    span: Span::new(10, 18),
                    mark: Mark::link("https://fresh.io"),
                },
            ]
        );
    }

    #[test]
    fn changed_href_on_the_same_span_is_replaced() {
        let current = vec![LinkTarget::new(Span::new(0, 4), "https://old.io")];
        let desired = vec![LinkTarget::new(Span::new(0, 4), "https://new.io")];
        let ops = diff_links(&current, &desired);
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], Operation::RemoveMark { .. }));
        assert!(matches!(ops[1], Operation::AddMark { .. }));
    }

    #[test]
    fn extent_covers_all_operations() {
        let ops = diff_links(
            &[LinkTarget::new(Span::new(7, 9), "x")],
            &[LinkTarget::new(Span::new(2, 4), "y")],
        );
        assert_eq!(extent(&ops), Some(Span::new(2, 9)));
        assert_eq!(extent(&[]), None);
    }
}
